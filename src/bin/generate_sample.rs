//! Writes a synthetic EnKF output directory that `enkf-plot` can read:
//! `<variable>_0.dat`, `<variable>_1.dat` for every variable plus
//! `obsD.dat` and `obsH.dat`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

const DAYS: usize = 366;
const ENSEMBLE_PREAMBLE: usize = 53;
const ENSEMBLE_TRAILER: usize = 33;
const OBSERVATION_PREAMBLE: usize = 3;
const POPULATION: f64 = 5.3e6;

/// Generate synthetic prior/posterior ensembles and observations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to write the .dat files into (created if missing)
    out_dir: PathBuf,

    /// Number of ensemble members per file
    #[arg(long, default_value_t = 50)]
    members: usize,

    /// Seed for the deterministic generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

// ---------------------------------------------------------------------------
// Epidemic curve shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Single wave peaking at `peak` (days).
    Wave { amplitude: f64, peak: f64, width: f64 },
    /// Cumulative count approaching `total`.
    Rising { total: f64, mid: f64, rate: f64 },
    /// `start` minus a cumulative drop of `total`.
    Falling { start: f64, total: f64, mid: f64, rate: f64 },
}

impl Shape {
    /// Value at day `t` with the amplitude scaled and the timing shifted.
    fn at(self, t: f64, scale: f64, shift: f64) -> f64 {
        let logistic = |mid: f64, rate: f64| 1.0 / (1.0 + (-(t - mid - shift) * rate).exp());
        match self {
            Shape::Wave { amplitude, peak, width } => {
                scale * amplitude * (-((t - peak - shift) / width).powi(2)).exp()
            }
            Shape::Rising { total, mid, rate } => scale * total * logistic(mid, rate),
            Shape::Falling {
                start,
                total,
                mid,
                rate,
            } => start - scale * total * logistic(mid, rate),
        }
    }
}

const VARIABLES: [(&str, Shape); 7] = [
    ("dead", Shape::Rising { total: 2400.0, mid: 95.0, rate: 0.06 }),
    ("hosp", Shape::Wave { amplitude: 1300.0, peak: 80.0, width: 28.0 }),
    ("case", Shape::Rising { total: 260_000.0, mid: 75.0, rate: 0.07 }),
    ("susc", Shape::Falling { start: POPULATION, total: 900_000.0, mid: 75.0, rate: 0.07 }),
    ("recov", Shape::Rising { total: 880_000.0, mid: 90.0, rate: 0.06 }),
    ("infec", Shape::Wave { amplitude: 120_000.0, peak: 70.0, width: 25.0 }),
    ("expos", Shape::Wave { amplitude: 150_000.0, peak: 64.0, width: 24.0 }),
];

// ---------------------------------------------------------------------------
// Deterministic randomness
// ---------------------------------------------------------------------------

/// SplitMix64 stream; reproducible for a given `--seed`.
struct Jitter(u64);

impl Jitter {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal draw via Box-Muller.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let r = (-2.0 * self.unit().max(f64::MIN_POSITIVE).ln()).sqrt();
        mean + std_dev * r * (std::f64::consts::TAU * self.unit()).cos()
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Relative amplitude spread and timing spread (days) of each stage.
const STAGES: [(u8, f64, f64); 2] = [(0, 0.25, 12.0), (1, 0.06, 3.0)];

fn ensemble_table(
    name: &str,
    shape: Shape,
    members: usize,
    spread: (f64, f64),
    rng: &mut Jitter,
) -> String {
    let perturbations: Vec<(f64, f64)> = (0..members)
        .map(|_| (rng.gauss(1.0, spread.0).max(0.05), rng.gauss(0.0, spread.1)))
        .collect();

    let mut s = String::new();
    writeln!(s, "TITLE = \"EnKF ensemble for {name}\"").unwrap();
    for i in 1..ENSEMBLE_PREAMBLE {
        writeln!(s, "# generator metadata line {i}").unwrap();
    }
    write!(s, "time mean std").unwrap();
    for m in 0..members {
        write!(s, " mem{m}").unwrap();
    }
    s.push_str(" flag\n");

    for day in 0..DAYS {
        let t = day as f64;
        let values: Vec<f64> = perturbations
            .iter()
            .map(|&(scale, shift)| shape.at(t, scale, shift))
            .collect();
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        write!(s, "{t:.1} {mean:.4} {:.4}", var.sqrt()).unwrap();
        for v in &values {
            write!(s, " {v:.4}").unwrap();
        }
        s.push_str(" 0\n");
    }

    for i in 0..ENSEMBLE_TRAILER {
        writeln!(s, "# trailer {i}").unwrap();
    }
    s
}

fn observation_table(shape: Shape, rng: &mut Jitter) -> String {
    let mut s = String::new();
    for i in 0..OBSERVATION_PREAMBLE {
        writeln!(s, "# observation metadata line {i}").unwrap();
    }
    s.push_str("index time value std\n");

    for (i, day) in (7..120).step_by(7).enumerate() {
        let truth = shape.at(day as f64, 1.0, 0.0);
        let std_dev = (0.1 * truth).max(1.0);
        let observed = rng.gauss(truth, std_dev).max(0.0);
        writeln!(s, "{i} {day}.0 {observed:.2} {std_dev:.2}").unwrap();
    }
    s
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = Jitter(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for (name, shape) in VARIABLES {
        for (stage, amp_spread, time_spread) in STAGES {
            let spread = (amp_spread, time_spread);
            let table = ensemble_table(name, shape, args.members, spread, &mut rng);
            write(&args.out_dir.join(format!("{name}_{stage}.dat")), &table)?;
        }
    }

    for (name, suffix) in [("dead", "D"), ("hosp", "H")] {
        let shape = VARIABLES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, shape)| shape)
            .with_context(|| format!("no curve for {name}"))?;
        let table = observation_table(shape, &mut rng);
        write(&args.out_dir.join(format!("obs{suffix}.dat")), &table)?;
    }

    println!(
        "Wrote {} ensemble files ({} members, {DAYS} days) and 2 observation files to {}",
        VARIABLES.len() * STAGES.len(),
        args.members,
        args.out_dir.display()
    );
    Ok(())
}
