use crate::color::Rgb;
use crate::data::model::Variable;

pub const X_LABEL: &str = "Time (days)";
pub const Y_LABEL: &str = "Number of people (-)";

// ---------------------------------------------------------------------------
// Figure primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
}

/// Role of a line within an ensemble; decides its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRole {
    Member,
    Mean,
    Spread,
}

impl TraceRole {
    /// Line width in points.
    pub fn width_pt(self) -> f64 {
        match self {
            TraceRole::Member => 0.5,
            TraceRole::Mean | TraceRole::Spread => 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trace {
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    pub dash: Dash,
    pub role: TraceRole,
}

/// Observations drawn as markers with symmetric vertical error bars.
#[derive(Debug, Clone)]
pub struct ErrorBars {
    pub color: Rgb,
    /// `(x, y, half-height)` per point.
    pub points: Vec<(f64, f64, f64)>,
}

// ---------------------------------------------------------------------------
// Figure – everything drawn for one variable
// ---------------------------------------------------------------------------

/// Backend-neutral description of one variable's plot.
///
/// Traces are kept in drawing order: later traces are drawn over earlier
/// ones.
#[derive(Debug, Clone)]
pub struct Figure {
    pub variable: Variable,
    pub traces: Vec<Trace>,
    pub observations: Option<ErrorBars>,
    /// Legend patch: label and fill colour.
    pub legend: (String, Rgb),
}

impl Figure {
    pub fn new(variable: Variable, color: Rgb) -> Self {
        Figure {
            variable,
            traces: Vec::new(),
            observations: None,
            legend: (variable.to_string(), color),
        }
    }

    /// Axis ranges `(x_min..x_max, y_min..y_max)` covering every trace and
    /// error bar, padded by 5% so nothing touches the frame.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let trace_points = self.traces.iter().flat_map(|t| t.points.iter().copied());
        let bar_points = self
            .observations
            .iter()
            .flat_map(|o| o.points.iter())
            .flat_map(|&(x, y, e)| [(x, y - e.abs()), (x, y + e.abs())]);

        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in trace_points.chain(bar_points) {
            if !px.is_finite() || !py.is_finite() {
                continue;
            }
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }

        (pad(x), pad(y))
    }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo > hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let d = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        return (lo - d, hi + d);
    }
    (lo - span * 0.05, hi + span * 0.05)
}
