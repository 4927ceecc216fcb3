// ampere_core/src/estimation/mod.rs

use crate::error::Result;
use crate::types::Covariance;

pub mod ekf;
pub mod filters;
pub mod sequence;
pub mod state;

pub use state::{FilterState, ProcessNoise};

/// Where a filter is in its life cycle.
///
/// There is no `Corrected` phase: the measurement update does not exist yet,
/// so every state a filter holds is a prior. The initial guess counts as the
/// prior for the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    Uninitialized,
    Predicted,
}

/// The time-update capability of a state estimator.
///
/// The estimation loop is generic over this trait. A measurement update will
/// be a separate capability working on the same [`FilterState`] value.
pub trait Predict {
    /// Advances the state by `delta_t` seconds with `current` held constant over
    /// the interval. On error the previous state is kept.
    fn predict(&mut self, delta_t: f64, current: f64) -> Result<&FilterState>;

    /// Returns the current best estimate, if the filter has one.
    fn state(&self) -> Option<&FilterState>;

    /// Replaces `P` while keeping the mean, e.g. after a numerical failure.
    fn reset_covariance(&mut self, covariance: Covariance) -> Result<()>;
}
