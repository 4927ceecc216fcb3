// ampere_core/src/error.rs

use thiserror::Error;

/// Everything the numeric core can report to its caller.
///
/// The core never retries and never repairs state on its own. Whoever drives
/// the estimation loop decides whether a failure aborts the run or is handled
/// (for example by re-seeding the covariance).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// A circuit parameter, noise entry or sample interval is non-physical.
    #[error("invalid parameter `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Covariance propagation produced a non-finite or negative-variance result.
    #[error("numerical instability in covariance propagation: {reason}")]
    NumericalInstability { reason: String },

    /// A predict was requested before the filter was given an initial state.
    #[error("filter has not been initialized")]
    Uninitialized,

    /// Two consecutive samples did not advance in time.
    #[error("sample {index} does not advance time (delta_t = {delta_t} s)")]
    NonMonotonicTime { index: usize, delta_t: f64 },
}

impl EstimationError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T, E = EstimationError> = std::result::Result<T, E>;
