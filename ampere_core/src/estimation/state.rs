// ampere_core/src/estimation/state.rs

use crate::error::{EstimationError, Result};
use crate::types::{Covariance, StateVariable, StateVector};

/// Tolerance used when checking that a user-supplied covariance is symmetric.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// The filter's belief about the cell: mean `x` and covariance `P`.
///
/// A plain value type. The predict step consumes one and produces the next,
/// and a future measurement update can do the same without any change to the
/// predict contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// `[soc, v1, v2]`.
    pub x: StateVector,
    /// The covariance matrix `P`.
    pub covariance: Covariance,
    /// Seconds of propagation applied since the state was created.
    pub last_update_timestamp: f64,
}

impl Default for FilterState {
    /// Half charge, relaxed branches, identity covariance.
    fn default() -> Self {
        Self::new(StateVector::new(0.5, 0.0, 0.0), Covariance::identity())
    }
}

impl FilterState {
    pub fn new(x: StateVector, covariance: Covariance) -> Self {
        Self {
            x,
            covariance,
            last_update_timestamp: 0.0,
        }
    }

    /// Builds a state with a diagonal covariance.
    pub fn from_diagonal(x: StateVector, variances: [f64; 3]) -> Self {
        Self::new(
            x,
            Covariance::from_diagonal(&StateVector::from(variances)),
        )
    }

    pub fn get(&self, var: StateVariable) -> f64 {
        self.x[var.index()]
    }

    pub fn variance(&self, var: StateVariable) -> f64 {
        self.covariance[(var.index(), var.index())]
    }

    /// Checks that the mean is finite and that `P` is a usable covariance:
    /// finite, symmetric, with non-negative variances.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.x.iter().find(|v| !v.is_finite()) {
            return Err(EstimationError::invalid("x", *bad, "state must be finite"));
        }
        if let Some(bad) = self.covariance.iter().find(|v| !v.is_finite()) {
            return Err(EstimationError::invalid(
                "covariance",
                *bad,
                "covariance must be finite",
            ));
        }
        for i in 0..3 {
            let variance = self.covariance[(i, i)];
            if variance < 0.0 {
                return Err(EstimationError::invalid(
                    "covariance",
                    variance,
                    "variances must be non-negative",
                ));
            }
        }
        let asymmetry = (self.covariance - self.covariance.transpose()).amax();
        if asymmetry > SYMMETRY_TOLERANCE {
            return Err(EstimationError::invalid(
                "covariance",
                asymmetry,
                "covariance must be symmetric",
            ));
        }
        Ok(())
    }
}

/// The process-noise covariance `Q`, diagonal and constant for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessNoise(Covariance);

impl Default for ProcessNoise {
    fn default() -> Self {
        Self(Covariance::from_diagonal_element(1e-6))
    }
}

impl ProcessNoise {
    /// Builds `Q = diag(variances)`. Every variance must be finite and non-negative.
    pub fn from_diagonal(variances: [f64; 3]) -> Result<Self> {
        for v in variances {
            if !v.is_finite() || v < 0.0 {
                return Err(EstimationError::invalid(
                    "process_noise",
                    v,
                    "variances must be finite and non-negative",
                ));
            }
        }
        Ok(Self(Covariance::from_diagonal(&StateVector::from(variances))))
    }

    pub fn matrix(&self) -> &Covariance {
        &self.0
    }
}
