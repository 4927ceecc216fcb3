// ampere_core/src/estimation/sequence.rs

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{EstimationError, Result};
use crate::estimation::Predict;
use crate::messages::{Estimate, MeasurementSample};
use crate::time::seconds_between;
use crate::types::Covariance;

/// Which current drives the interval between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAlignment {
    /// The current logged at the start of the interval, held until the next
    /// sample. Matches the zero-order-hold assumption of the discretization.
    #[default]
    Trailing,
    /// The mean of the currents logged at both ends of the interval.
    Average,
}

impl ControlAlignment {
    pub fn control(self, previous: &MeasurementSample, current: &MeasurementSample) -> f64 {
        match self {
            ControlAlignment::Trailing => previous.current,
            ControlAlignment::Average => 0.5 * (previous.current + current.current),
        }
    }
}

/// What the loop does when covariance propagation becomes unstable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstabilityPolicy {
    /// Stop the run and report the error.
    #[default]
    Abort,
    /// Re-seed `P` from the initial covariance and retry the step once.
    ResetCovariance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOptions {
    pub alignment: ControlAlignment,
    pub on_instability: InstabilityPolicy,
    /// The covariance used when `on_instability` is `ResetCovariance`.
    pub reset_covariance: Covariance,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            alignment: ControlAlignment::default(),
            on_instability: InstabilityPolicy::default(),
            reset_covariance: Covariance::identity(),
        }
    }
}

/// Runs the filter over an ordered series of samples.
///
/// Sample 0 has no predecessor, so it is reported with the filter's initial
/// state and no predict is issued. Every later sample costs exactly one
/// predict over the interval since its predecessor. Returns one [`Estimate`]
/// per sample.
pub fn run_sequence<F>(
    filter: &mut F,
    samples: &[MeasurementSample],
    options: &SequenceOptions,
) -> Result<Vec<Estimate>>
where
    F: Predict + ?Sized,
{
    let Some(first) = samples.first() else {
        return Ok(Vec::new());
    };
    let initial = filter.state().ok_or(EstimationError::Uninitialized)?;

    let mut estimates = Vec::with_capacity(samples.len());
    estimates.push(Estimate {
        index: 0,
        elapsed_seconds: 0.0,
        x: initial.x,
        covariance: initial.covariance,
    });

    for (offset, pair) in samples.windows(2).enumerate() {
        let index = offset + 1;
        let (previous, sample) = (&pair[0], &pair[1]);

        let delta_t = seconds_between(previous.timestamp, sample.timestamp);
        if delta_t <= 0.0 {
            return Err(EstimationError::NonMonotonicTime { index, delta_t });
        }
        let control = options.alignment.control(previous, sample);

        let state = match filter.predict(delta_t, control).cloned() {
            Ok(state) => state,
            Err(EstimationError::NumericalInstability { reason })
                if options.on_instability == InstabilityPolicy::ResetCovariance =>
            {
                warn!(index, %reason, "covariance propagation unstable, re-seeding covariance");
                filter.reset_covariance(options.reset_covariance)?;
                filter.predict(delta_t, control)?.clone()
            }
            Err(e) => return Err(e),
        };

        trace!(index, delta_t, control, soc = state.x[0], "sample processed");
        estimates.push(Estimate {
            index,
            elapsed_seconds: seconds_between(first.timestamp, sample.timestamp),
            x: state.x,
            covariance: state.covariance,
        });
    }

    Ok(estimates)
}
