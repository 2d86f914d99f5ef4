//! Command-line arguments.
//!
//! Long option names keep the underscores used by the existing EnKF
//! tooling scripts (`--data_dir`, `--figs_out_dir`).

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::config::OutputFormat;
use crate::data::model::Variable;

/// Plot prior and posterior EnKF ensembles against observed data
#[derive(Parser, Debug)]
#[command(name = "enkf-plot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The directory where the EnKF tecplot files can be found
    #[arg(long = "data_dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub data_dir: PathBuf,

    /// The directory where the figures will be written
    #[arg(long = "figs_out_dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub figs_out_dir: PathBuf,

    /// Image format of the saved figures (png, jpg, bmp, tiff, svg)
    #[arg(long, default_value = "png", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Whether the figures should also be shown in a window
    #[arg(long, value_name = "true|false", default_value_t = false, action = ArgAction::Set)]
    pub show: bool,

    /// Resolution the figures are saved at
    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: u32,

    /// The variables to plot
    #[arg(long, value_enum, num_args = 1.., default_values_t = Variable::ALL)]
    pub variables: Vec<Variable>,

    /// Keep plotting the remaining variables after one fails
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const REQUIRED: [&str; 5] = ["enkf-plot", "--data_dir", "data", "--figs_out_dir", "figs"];

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(REQUIRED.iter().chain(extra))
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_script_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.figs_out_dir, PathBuf::from("figs"));
        assert_eq!(cli.format.extension(), "png");
        assert!(!cli.show);
        assert_eq!(cli.dpi, 1200);
        assert_eq!(cli.variables, Variable::ALL.to_vec());
        assert!(!cli.keep_going);
    }

    #[test]
    fn variables_take_multiple_values() {
        let cli = parse(&["--variables", "dead", "hosp", "--dpi", "300"]).unwrap();
        assert_eq!(cli.variables, vec![Variable::Dead, Variable::Hosp]);
        assert_eq!(cli.dpi, 300);
    }

    #[test]
    fn show_takes_true_or_false() {
        assert!(parse(&["--show", "true"]).unwrap().show);
        assert!(!parse(&["--show", "false"]).unwrap().show);
        assert!(parse(&["--show", "yes"]).is_err());
    }

    #[test]
    fn required_flags_are_enforced() {
        assert!(Cli::try_parse_from(["enkf-plot", "--data_dir", "data"]).is_err());
        assert!(Cli::try_parse_from(["enkf-plot", "--figs_out_dir", "figs"]).is_err());
    }

    #[test]
    fn invalid_choices_are_rejected() {
        assert!(parse(&["--variables", "zombies"]).is_err());
        assert!(parse(&["--format", "pdf"]).is_err());
        assert!(parse(&["--dpi", "0"]).is_err());
        assert!(parse(&["--dpi", "high"]).is_err());
    }
}
