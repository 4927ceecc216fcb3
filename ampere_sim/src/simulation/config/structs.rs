// ampere_sim/src/simulation/config/structs.rs

use ampere_core::estimation::sequence::{ControlAlignment, InstabilityPolicy, SequenceOptions};
use ampere_core::estimation::{FilterState, ProcessNoise};
use ampere_core::error::EstimationError;
use ampere_core::models::CircuitParameters;
use ampere_core::types::{Covariance, StateVector};
use serde::{Deserialize, Serialize};

use super::ConfigError;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # AmpereConfig
/// Everything a run needs besides the measurement log itself.
/// This struct is the root of the data parsed from a cell `.toml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct AmpereConfig {
    #[serde(default)] // Use default if the [estimator] section is missing
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub cell: CellConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in the cell .toml file.
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Initial guess `[soc, v1, v2]`.
    pub initial_state: [f64; 3],
    /// Diagonal of the initial covariance `P0`. Also used when re-seeding.
    pub initial_covariance_diagonal: [f64; 3],
    /// Diagonal of the process noise `Q`.
    pub process_noise_diagonal: [f64; 3],
    #[serde(default)]
    pub alignment: ControlAlignment,
    #[serde(default)]
    pub on_instability: InstabilityPolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            initial_state: [0.5, 0.0, 0.0],
            initial_covariance_diagonal: [1.0, 1.0, 1.0],
            process_noise_diagonal: [1e-6, 1e-6, 1e-6],
            alignment: ControlAlignment::default(),
            on_instability: InstabilityPolicy::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn initial_covariance(&self) -> Covariance {
        Covariance::from_diagonal(&StateVector::from(self.initial_covariance_diagonal))
    }

    pub fn initial_state(&self) -> FilterState {
        FilterState::new(StateVector::from(self.initial_state), self.initial_covariance())
    }

    pub fn process_noise(&self) -> Result<ProcessNoise, EstimationError> {
        ProcessNoise::from_diagonal(self.process_noise_diagonal)
    }

    pub fn sequence_options(&self) -> SequenceOptions {
        SequenceOptions {
            alignment: self.alignment,
            on_instability: self.on_instability,
            reset_covariance: self.initial_covariance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellConfig {
    /// The temperature bucket whose parameter set is used for the run.
    pub temperature: i32,
    /// Identified circuit parameters, one set per temperature bucket.
    pub parameter_sets: Vec<CircuitParameters>,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            temperature: 25,
            parameter_sets: vec![CircuitParameters::default()],
        }
    }
}

impl CellConfig {
    /// Picks the parameter set identified at `self.temperature`.
    pub fn parameters(&self) -> Result<CircuitParameters, ConfigError> {
        let mut matches = self
            .parameter_sets
            .iter()
            .filter(|p| p.temperature == self.temperature);

        match (matches.next(), matches.next()) {
            (Some(params), None) => Ok(*params),
            (Some(_), Some(_)) => Err(ConfigError::DuplicateTemperature {
                temperature: self.temperature,
            }),
            (None, _) => Err(ConfigError::NoParameterSet {
                temperature: self.temperature,
                available: self.parameter_sets.iter().map(|p| p.temperature).collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Field separator of the measurement log.
    pub delimiter: char,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl IngestConfig {
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::InvalidDelimiter {
                delimiter: self.delimiter,
            })
    }
}
