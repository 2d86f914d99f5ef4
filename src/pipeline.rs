use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};

use crate::config::RunConfig;
use crate::data::model::Variable;
use crate::export::save_figure;
use crate::figure::Figure;
use crate::plot::plot_variable;

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Outcome of a run over all requested variables.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Written figure files, in processing order.
    pub saved: Vec<PathBuf>,
    /// Variables that failed; only populated with `keep_going`.
    pub failed: Vec<(Variable, anyhow::Error)>,
    /// Figures kept for the interactive viewer; only populated with `show`.
    pub retained: Vec<Figure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Plot and save every requested variable, one after the other.
///
/// Without `keep_going` the first failure ends the run and is returned.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let out_dir = config.output.dir();
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut report = RunReport::default();

    for &variable in &config.variables {
        match plot_and_save(config, variable) {
            Ok((figure, path)) => {
                info!("saved {}", path.display());
                report.saved.push(path);
                if config.show {
                    report.retained.push(figure);
                }
            }
            Err(err) if config.keep_going => {
                error!("{variable}: {err:#}");
                report.failed.push((variable, err));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}

fn plot_and_save(config: &RunConfig, variable: Variable) -> Result<(Figure, PathBuf)> {
    let figure = plot_variable(&config.layout, variable)?;
    let path =
        save_figure(&figure, &config.output).with_context(|| format!("saving {variable}"))?;
    Ok((figure, path))
}
