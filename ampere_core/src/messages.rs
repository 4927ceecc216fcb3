// ampere_core/src/messages.rs

use chrono::NaiveDateTime;

use crate::types::{Covariance, StateVector};

// =========================================================================
// == Input Data ==
// =========================================================================

/// One row of a measurement log: what the cell was doing at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementSample {
    pub timestamp: NaiveDateTime,
    /// Terminal voltage under load, in volts.
    pub voltage: f64,
    /// Load current in amperes. Positive values discharge the cell.
    pub current: f64,
}

// =========================================================================
// == Output Data ==
// =========================================================================

/// The filter's belief at the time of one sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    /// Position of the sample in the input series.
    pub index: usize,
    /// Seconds since the first sample of the run.
    pub elapsed_seconds: f64,
    pub x: StateVector,
    pub covariance: Covariance,
}

impl Estimate {
    /// The per-state variances, `diag(P)`.
    pub fn variances(&self) -> [f64; 3] {
        let d = self.covariance.diagonal();
        [d[0], d[1], d[2]]
    }
}
