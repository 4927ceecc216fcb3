// ampere_sim/src/simulation/config/mod.rs

//! This module handles loading and validating the run configuration:
//! built-in defaults, then an optional TOML file, then `AMPERE_` environment
//! variables (nested keys separated by `__`, e.g. `AMPERE_CELL__TEMPERATURE`).

pub mod structs;

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use thiserror::Error;
use tracing::info;

pub use structs::{AmpereConfig, CellConfig, EstimatorConfig, IngestConfig};

/// Prefix of the environment variables that override configuration values.
pub const ENV_PREFIX: &str = "AMPERE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} does not exist", .path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("no circuit parameter set for temperature {temperature} (available: {available:?})")]
    NoParameterSet { temperature: i32, available: Vec<i32> },

    #[error("more than one circuit parameter set for temperature {temperature}")]
    DuplicateTemperature { temperature: i32 },

    #[error("delimiter {delimiter:?} is not a single ASCII character")]
    InvalidDelimiter { delimiter: char },
}

/// Builds the layered provider without extracting it.
pub fn figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AmpereConfig::default()));
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Loads the configuration, failing if an explicitly requested file is absent.
pub fn load_config(config_path: Option<&Path>) -> Result<AmpereConfig, ConfigError> {
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        info!("Loading configuration from: {}", path.display());
    }

    let config: AmpereConfig = figment(config_path).extract().map_err(Box::new)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampere_core::estimation::sequence::{ControlAlignment, InstabilityPolicy};
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config, AmpereConfig::default());
            assert_eq!(config.cell.parameters().map_err(|e| e.to_string())?.capacity, 2500.0);
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cell.toml",
                r#"
                [estimator]
                initial_state = [0.9, 0.0, 0.0]
                initial_covariance_diagonal = [0.01, 0.001, 0.001]
                process_noise_diagonal = [1e-8, 1e-6, 1e-6]
                alignment = "average"
                on_instability = "reset_covariance"

                [cell]
                temperature = 10

                [[cell.parameter_sets]]
                r0 = 0.012
                r1 = 0.006
                c1 = 1800.0
                r2 = 0.004
                c2 = 2500.0
                capacity = 9000.0
                temperature = 10

                [[cell.parameter_sets]]
                r0 = 0.010
                r1 = 0.005
                c1 = 2000.0
                r2 = 0.003
                c2 = 3000.0
                capacity = 9000.0
                temperature = 25

                [ingest]
                delimiter = ";"
                "#,
            )?;

            let config = load_config(Some(Path::new("cell.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.estimator.initial_state, [0.9, 0.0, 0.0]);
            assert_eq!(config.estimator.alignment, ControlAlignment::Average);
            assert_eq!(
                config.estimator.on_instability,
                InstabilityPolicy::ResetCovariance
            );
            assert_eq!(config.ingest.delimiter_byte().map_err(|e| e.to_string())?, b';');

            let params = config.cell.parameters().map_err(|e| e.to_string())?;
            assert_eq!(params.temperature, 10);
            assert_eq!(params.r1, 0.006);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("cell.toml", "[cell]\ntemperature = 25\n")?;
            jail.set_env("AMPERE_ESTIMATOR__ALIGNMENT", "average");

            let config = load_config(Some(Path::new("cell.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.estimator.alignment, ControlAlignment::Average);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("cell.toml", "[estimator]\nsmoothing = 3\n")?;
            assert!(matches!(
                load_config(Some(Path::new("cell.toml"))),
                Err(ConfigError::Load(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            assert!(matches!(
                load_config(Some(Path::new("does_not_exist.toml"))),
                Err(ConfigError::MissingFile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn test_parameter_selection_errors() {
        let mut cell = CellConfig {
            temperature: 0,
            ..CellConfig::default()
        };
        match cell.parameters() {
            Err(ConfigError::NoParameterSet {
                temperature,
                available,
            }) => {
                assert_eq!(temperature, 0);
                assert_eq!(available, vec![25]);
            }
            other => panic!("expected NoParameterSet, got {other:?}"),
        }

        cell.temperature = 25;
        let duplicate = cell.parameter_sets[0];
        cell.parameter_sets.push(duplicate);
        assert!(matches!(
            cell.parameters(),
            Err(ConfigError::DuplicateTemperature { temperature: 25 })
        ));
    }

    #[test]
    fn test_delimiter_must_be_ascii() {
        let ingest = IngestConfig { delimiter: 'é' };
        assert!(matches!(
            ingest.delimiter_byte(),
            Err(ConfigError::InvalidDelimiter { .. })
        ));
        assert_eq!(IngestConfig::default().delimiter_byte().unwrap(), b',');
    }
}
