/// Data layer: core types and loading of the filter output tables.
///
/// Architecture:
/// ```text
///  <variable>_0.dat / <variable>_1.dat      obsH.dat / obsD.dat
///        │                                      │
///        ▼                                      ▼
///   ┌────────────────┐                 ┌───────────────────┐
///   │ load_ensemble   │                 │ load_observations  │
///   └────────────────┘                 └───────────────────┘
///        │                                      │
///        ▼                                      ▼
///   EnsembleSeries                         ObservationSeries
///   time, mean, std dev, members           time, value, std dev
/// ```

pub mod loader;
pub mod model;
