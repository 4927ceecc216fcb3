use ampere_core::estimation::sequence::ControlAlignment;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::simulation::config::AmpereConfig;

/// Ampere: equivalent-circuit state estimation for a battery cell.
///
/// Reads a measurement log (CSV with `timestamp`, `voltage_load` and
/// `current_load` columns), runs the EKF time update over it and prints the
/// resulting state vector.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The measurement log to process.
    pub log: PathBuf,

    /// Cell/estimator configuration TOML file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Temperature bucket (°C) selecting the circuit parameter set.
    #[arg(short, long, allow_negative_numbers = true)]
    pub temperature: Option<i32>,

    /// Which current drives each interval between samples.
    #[arg(short, long, value_enum)]
    pub alignment: Option<AlignmentArg>,

    /// Write a per-sample CSV trace of the estimates to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `ampere_core=trace`. Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlignmentArg {
    /// Current logged at the start of the interval.
    Trailing,
    /// Mean of the currents at both ends of the interval.
    Average,
}

impl From<AlignmentArg> for ControlAlignment {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Trailing => ControlAlignment::Trailing,
            AlignmentArg::Average => ControlAlignment::Average,
        }
    }
}

impl Cli {
    /// Command-line flags win over file and environment configuration.
    pub fn apply_overrides(&self, config: &mut AmpereConfig) {
        if let Some(temperature) = self.temperature {
            config.cell.temperature = temperature;
        }
        if let Some(alignment) = self.alignment {
            config.estimator.alignment = alignment.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["ampere", "log.csv"]).unwrap();
        assert_eq!(cli.log, PathBuf::from("log.csv"));
        assert!(cli.config.is_none());
        assert!(cli.alignment.is_none());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "ampere",
            "log.csv",
            "--temperature",
            "-10",
            "--alignment",
            "average",
        ])
        .unwrap();

        let mut config = AmpereConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.cell.temperature, -10);
        assert_eq!(config.estimator.alignment, ControlAlignment::Average);
    }

    #[test]
    fn test_rejects_unknown_alignment() {
        assert!(Cli::try_parse_from(["ampere", "log.csv", "--alignment", "leading"]).is_err());
    }
}
