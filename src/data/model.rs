use std::fmt;

use clap::ValueEnum;

// ---------------------------------------------------------------------------
// Variable – one tracked compartment of the SEIR model
// ---------------------------------------------------------------------------

/// A model variable with its own pair of ensemble files and figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Variable {
    Dead,
    Hosp,
    Case,
    Susc,
    Recov,
    Infec,
    Expos,
}

impl Variable {
    /// All variables, in the order figures are produced by default.
    pub const ALL: [Variable; 7] = [
        Variable::Dead,
        Variable::Hosp,
        Variable::Case,
        Variable::Susc,
        Variable::Recov,
        Variable::Infec,
        Variable::Expos,
    ];

    /// File-name stem used by the filter output (`dead_0.dat`, …).
    pub fn name(self) -> &'static str {
        match self {
            Variable::Dead => "dead",
            Variable::Hosp => "hosp",
            Variable::Case => "case",
            Variable::Susc => "susc",
            Variable::Recov => "recov",
            Variable::Infec => "infec",
            Variable::Expos => "expos",
        }
    }

    /// Observed data assimilated for this variable, if any.
    pub fn observation(self) -> Option<ObservationKind> {
        match self {
            Variable::Dead => Some(ObservationKind::Deaths),
            Variable::Hosp => Some(ObservationKind::Hospitalized),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Stage – prior (before analysis) or posterior (after analysis)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prior,
    Posterior,
}

impl Stage {
    /// Numeric suffix in the ensemble file name.
    pub fn index(self) -> u8 {
        match self {
            Stage::Prior => 0,
            Stage::Posterior => 1,
        }
    }

    /// Fraction of the way towards white the member traces are drawn.
    pub fn fading(self) -> f32 {
        match self {
            Stage::Prior => 0.9,
            Stage::Posterior => 0.6,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Prior => f.write_str("prior"),
            Stage::Posterior => f.write_str("posterior"),
        }
    }
}

// ---------------------------------------------------------------------------
// ObservationKind – which observed data file backs a variable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationKind {
    Deaths,
    Hospitalized,
}

impl ObservationKind {
    /// Letter appended to the observation base path (`obsD.dat`).
    pub fn suffix(self) -> &'static str {
        match self {
            ObservationKind::Deaths => "D",
            ObservationKind::Hospitalized => "H",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObservationKind::Deaths => "Observed deaths",
            ObservationKind::Hospitalized => "Observed hospitalized",
        }
    }
}

// ---------------------------------------------------------------------------
// EnsembleSeries – one `<variable>_<stage>.dat` file
// ---------------------------------------------------------------------------

/// Ensemble statistics and member trajectories over time.
///
/// `members[i]` is the trajectory of member `i`, so every inner vector has
/// the same length as `time`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSeries {
    pub time: Vec<f64>,
    pub mean: Vec<f64>,
    pub std_dev: Vec<f64>,
    pub members: Vec<Vec<f64>>,
}

impl EnsembleSeries {
    /// Number of time steps (rows in the source table).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Number of ensemble members (member columns in the source table).
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// `mean + k * std_dev` for each time step.
    pub fn band(&self, k: f64) -> Vec<f64> {
        self.mean
            .iter()
            .zip(&self.std_dev)
            .map(|(m, s)| m + k * s)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ObservationSeries – one `obs<H|D>.dat` file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    pub time: Vec<f64>,
    pub observed: Vec<f64>,
    pub std_dev: Vec<f64>,
}

impl ObservationSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dead_and_hosp_have_observations() {
        assert_eq!(Variable::Dead.observation(), Some(ObservationKind::Deaths));
        assert_eq!(
            Variable::Hosp.observation(),
            Some(ObservationKind::Hospitalized)
        );
        for v in [
            Variable::Case,
            Variable::Susc,
            Variable::Recov,
            Variable::Infec,
            Variable::Expos,
        ] {
            assert_eq!(v.observation(), None, "{v} should have no observation");
        }
    }

    #[test]
    fn value_enum_names_match_file_stems() {
        for v in Variable::ALL {
            let parsed = Variable::from_str(v.name(), false).unwrap();
            assert_eq!(parsed, v);
        }
    }

    #[test]
    fn band_offsets_mean_by_std_dev() {
        let series = EnsembleSeries {
            time: vec![0.0, 1.0],
            mean: vec![10.0, 20.0],
            std_dev: vec![1.0, 2.5],
            members: vec![],
        };
        assert_eq!(series.band(1.0), vec![11.0, 22.5]);
        assert_eq!(series.band(-1.0), vec![9.0, 17.5]);
    }
}
