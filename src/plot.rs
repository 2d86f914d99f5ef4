use anyhow::{Context, Result};
use log::{debug, info};

use crate::color::{lighter, variable_color, Rgb};
use crate::config::DataLayout;
use crate::data::loader::{load_ensemble, load_observations};
use crate::data::model::{EnsembleSeries, ObservationSeries, Stage, Variable};
use crate::figure::{Dash, ErrorBars, Figure, Trace, TraceRole};

// ---------------------------------------------------------------------------
// Variable → Figure
// ---------------------------------------------------------------------------

/// Load every file backing `variable` and lay out its figure.
///
/// The prior is added before the posterior: it has the wider spread and
/// would hide the posterior if drawn on top of it.
pub fn plot_variable(layout: &DataLayout, variable: Variable) -> Result<Figure> {
    let color = variable_color(variable);
    let mut figure = Figure::new(variable, color);

    for stage in [Stage::Prior, Stage::Posterior] {
        let path = layout.ensemble_path(variable, stage);
        let ensemble = load_ensemble(&path)
            .with_context(|| format!("loading {stage} ensemble for {variable}"))?;
        info!("plotting {stage} for {variable}");
        add_ensemble(&mut figure, &ensemble, color, stage.fading());
    }

    match variable.observation() {
        Some(kind) => {
            info!("observed data for {variable}: {}", kind.label());
            let path = layout.observation_path(kind);
            let obs = load_observations(&path)
                .with_context(|| format!("loading observations for {variable}"))?;
            debug!("{} observations", obs.len());
            debug!("observation time: {:?}", obs.time);
            debug!("observed values: {:?}", obs.observed);
            debug!("observation std dev: {:?}", obs.std_dev);
            figure.observations = Some(error_bars(&obs, color));
        }
        None => debug!("no observed data for {variable}"),
    }

    Ok(figure)
}

/// Members as thin faded lines, then the mean and the ±1 std dev band in
/// the base colour.
pub fn add_ensemble(figure: &mut Figure, ensemble: &EnsembleSeries, color: Rgb, fading: f32) {
    let member_color = lighter(color, fading);

    for member in &ensemble.members {
        figure.traces.push(Trace {
            points: zip(&ensemble.time, member),
            color: member_color,
            dash: Dash::Solid,
            role: TraceRole::Member,
        });
    }

    figure.traces.push(Trace {
        points: zip(&ensemble.time, &ensemble.mean),
        color,
        dash: Dash::Solid,
        role: TraceRole::Mean,
    });

    for k in [1.0, -1.0] {
        figure.traces.push(Trace {
            points: zip(&ensemble.time, &ensemble.band(k)),
            color,
            dash: Dash::Dashed,
            role: TraceRole::Spread,
        });
    }
}

fn error_bars(obs: &ObservationSeries, color: Rgb) -> ErrorBars {
    let points = obs
        .time
        .iter()
        .zip(&obs.observed)
        .zip(&obs.std_dev)
        .map(|((&t, &y), &sd)| (t, y, sd))
        .collect();
    ErrorBars { color, points }
}

fn zip(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}
