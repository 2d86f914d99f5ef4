use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::ImageFormat;

use crate::cli::Cli;
use crate::data::model::{ObservationKind, Stage, Variable};

/// Stem shared by the observation files (`obsH.dat`, `obsD.dat`).
pub const OBSERVATION_STEM: &str = "obs";

// ---------------------------------------------------------------------------
// Input layout
// ---------------------------------------------------------------------------

/// Where the filter output for one run lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DataLayout {
            data_dir: data_dir.into(),
        }
    }

    /// `<data_dir>/<variable>_<stage>.dat`
    pub fn ensemble_path(&self, variable: Variable, stage: Stage) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.dat", variable.name(), stage.index()))
    }

    /// Base path the observation suffixes are appended to.
    pub fn observation_base(&self) -> PathBuf {
        self.data_dir.join(OBSERVATION_STEM)
    }

    /// Observation base path + `H`/`D` + `.dat`.
    pub fn observation_path(&self, kind: ObservationKind) -> PathBuf {
        let mut name: OsString = self.observation_base().into_os_string();
        name.push(kind.suffix());
        name.push(".dat");
        PathBuf::from(name)
    }
}

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

/// Encoding of the saved figures, parsed from `--format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rasterised through plotters' bitmap backend, encoded by `image`.
    Raster {
        extension: String,
        encoding: ImageFormat,
    },
    Svg,
}

impl OutputFormat {
    /// File extension, exactly as requested on the command line.
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Raster { extension, .. } => extension,
            OutputFormat::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.');
        if ext.eq_ignore_ascii_case("svg") {
            return Ok(OutputFormat::Svg);
        }
        match ImageFormat::from_extension(ext) {
            Some(
                encoding @ (ImageFormat::Png
                | ImageFormat::Jpeg
                | ImageFormat::Bmp
                | ImageFormat::Tiff),
            ) => Ok(OutputFormat::Raster {
                extension: ext.to_string(),
                encoding,
            }),
            _ => Err(format!(
                "unsupported figure format '{s}' (expected png, jpg, jpeg, bmp, tif, tiff or svg)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// Output settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub dir: PathBuf,
    pub format: OutputFormat,
    pub dpi: u32,
}

impl OutputSpec {
    /// `<dir>/<variable>.<format>`
    pub fn path_for(&self, variable: Variable) -> PathBuf {
        self.dir
            .join(format!("{}.{}", variable.name(), self.format.extension()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub layout: DataLayout,
    pub output: OutputSpec,
    pub show: bool,
    /// Requested variables, first occurrence order, no duplicates.
    pub variables: Vec<Variable>,
    pub keep_going: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut variables: Vec<Variable> = Vec::with_capacity(cli.variables.len());
        for &v in &cli.variables {
            if !variables.contains(&v) {
                variables.push(v);
            }
        }

        RunConfig {
            layout: DataLayout::new(&cli.data_dir),
            output: OutputSpec {
                dir: cli.figs_out_dir.clone(),
                format: cli.format.clone(),
                dpi: cli.dpi,
            },
            show: cli.show,
            variables,
            keep_going: cli.keep_going,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn ensemble_paths_use_stage_index() {
        let layout = DataLayout::new("/runs/a");
        assert_eq!(
            layout.ensemble_path(Variable::Infec, Stage::Prior),
            PathBuf::from("/runs/a/infec_0.dat")
        );
        assert_eq!(
            layout.ensemble_path(Variable::Infec, Stage::Posterior),
            PathBuf::from("/runs/a/infec_1.dat")
        );
    }

    #[test]
    fn observation_suffix_is_appended_to_base() {
        let layout = DataLayout::new("/runs/a");
        let base = layout.observation_base();
        assert_eq!(base, PathBuf::from("/runs/a/obs"));

        let dead = Variable::Dead.observation().unwrap();
        let hosp = Variable::Hosp.observation().unwrap();
        assert_eq!(
            layout.observation_path(dead),
            PathBuf::from(format!("{}D.dat", base.display()))
        );
        assert_eq!(
            layout.observation_path(hosp),
            PathBuf::from("/runs/a/obsH.dat")
        );
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("SVG".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);

        let jpg: OutputFormat = "jpg".parse().unwrap();
        assert_eq!(
            jpg,
            OutputFormat::Raster {
                extension: "jpg".into(),
                encoding: ImageFormat::Jpeg
            }
        );
        assert_eq!(jpg.extension(), "jpg");

        let png: OutputFormat = ".PNG".parse().unwrap();
        assert_eq!(png.extension(), "PNG");
    }

    #[test]
    fn unknown_formats_are_rejected() {
        for bad in ["pdf", "eps", "gif", ""] {
            assert!(bad.parse::<OutputFormat>().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn output_path_joins_variable_and_format() {
        let spec = OutputSpec {
            dir: PathBuf::from("figs"),
            format: "png".parse().unwrap(),
            dpi: 300,
        };
        assert_eq!(spec.path_for(Variable::Hosp), PathBuf::from("figs/hosp.png"));
    }

    #[test]
    fn duplicate_variables_keep_first_position() {
        let cli = Cli::try_parse_from([
            "enkf-plot",
            "--data_dir",
            "in",
            "--figs_out_dir",
            "out",
            "--variables",
            "hosp",
            "dead",
            "hosp",
        ])
        .unwrap();
        let config = RunConfig::from_cli(&cli);
        assert_eq!(config.variables, vec![Variable::Hosp, Variable::Dead]);
        assert_eq!(config.layout.data_dir, PathBuf::from("in"));
        assert_eq!(config.output.dir(), Path::new("out"));
    }
}
