// ampere_sim/src/simulation/run.rs

//! Wires ingestion, configuration and the estimation loop together.

use std::path::Path;

use ampere_core::error::EstimationError;
use ampere_core::estimation::filters::ExtendedKalmanFilter;
use ampere_core::estimation::sequence::{run_sequence, SequenceOptions};
use ampere_core::estimation::Predict;
use ampere_core::messages::{Estimate, MeasurementSample};
use thiserror::Error;
use tracing::info;

use crate::simulation::config::{AmpereConfig, ConfigError};
use crate::simulation::io::ingest::{load_samples, IngestError, IngestOptions};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("estimation failed: {0}")]
    Estimation(#[from] EstimationError),
}

/// The measured series together with one estimate per sample.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: Vec<MeasurementSample>,
    pub estimates: Vec<Estimate>,
}

impl RunOutput {
    pub fn final_estimate(&self) -> Option<&Estimate> {
        self.estimates.last()
    }
}

/// Builds the filter described by `config`, ready to run from its initial state.
pub fn build_filter(config: &AmpereConfig) -> Result<ExtendedKalmanFilter, RunError> {
    let params = config.cell.parameters()?;
    params.validate()?;
    let (tau1, tau2) = params.time_constants();
    info!(
        temperature = params.temperature,
        tau1, tau2, "Using circuit parameter set"
    );

    let filter = ExtendedKalmanFilter::with_state(
        Box::new(params),
        config.estimator.process_noise()?,
        config.estimator.initial_state(),
    )?;
    Ok(filter)
}

/// Ingests the whole log first, then runs `filter` over it. A log that fails
/// to ingest never reaches the filter.
pub fn run_with_filter<F>(
    log_path: &Path,
    ingest: &IngestOptions,
    filter: &mut F,
    options: &SequenceOptions,
) -> Result<RunOutput, RunError>
where
    F: Predict + ?Sized,
{
    let samples = load_samples(log_path, ingest)?;
    let estimates = run_sequence(filter, &samples, options)?;
    info!("Estimated {} samples", estimates.len());
    Ok(RunOutput { samples, estimates })
}

/// Runs the configured estimator over the measurement log at `log_path`.
pub fn run(config: &AmpereConfig, log_path: &Path) -> Result<RunOutput, RunError> {
    let mut filter = build_filter(config)?;
    let ingest = IngestOptions {
        delimiter: config.ingest.delimiter_byte()?,
    };
    run_with_filter(
        log_path,
        &ingest,
        &mut filter,
        &config.estimator.sequence_options(),
    )
}
