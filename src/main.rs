mod app;
mod cli;
mod color;
mod config;
mod data;
mod export;
mod figure;
mod pipeline;
mod plot;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;

use cli::Cli;
use config::RunConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = RunConfig::from_cli(&cli);
    info!(
        "plotting {} variable(s) from {} into {}",
        config.variables.len(),
        config.layout.data_dir.display(),
        config.output.dir().display()
    );

    let report = pipeline::run(&config)?;

    let outcome = if report.is_success() {
        Ok(())
    } else {
        let names: Vec<String> = report.failed.iter().map(|(v, _)| v.to_string()).collect();
        Err(anyhow!(
            "{} of {} variable(s) failed: {}",
            names.len(),
            config.variables.len(),
            names.join(", ")
        ))
    };

    if config.show && !report.retained.is_empty() {
        app::show_figures(report.retained)?;
    }

    outcome
}
