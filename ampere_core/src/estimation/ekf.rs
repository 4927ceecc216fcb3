// ampere_core/src/estimation/ekf.rs

use crate::error::{EstimationError, Result};
use crate::estimation::state::{FilterState, ProcessNoise};
use crate::models::DiscreteModel;
use crate::types::{Covariance, StateVector};

/// PURE FUNCTION: Propagates the mean one sample: `x_prior = A x + B i`.
///
/// Any sign of `current` is accepted, and the state-of-charge entry is not
/// clamped to `[0, 1]`.
pub fn predict_state(x: &StateVector, model: &DiscreteModel, current: f64) -> StateVector {
    model.a * x + model.b * current
}

/// PURE FUNCTION: Propagates the covariance one sample: `P_prior = A P Aᵀ + Q`.
///
/// The result is re-symmetrized so rounding asymmetry cannot build up over a
/// long run, then checked for non-finite entries and negative variances.
pub fn predict_covariance(
    p: &Covariance,
    model: &DiscreteModel,
    q: &ProcessNoise,
) -> Result<Covariance> {
    let p_prior = model.a * p * model.a.transpose() + q.matrix();
    let p_prior = symmetrize(&p_prior);
    check_covariance(&p_prior)?;
    Ok(p_prior)
}

/// Returns `(P + Pᵀ) / 2`.
pub fn symmetrize(p: &Covariance) -> Covariance {
    (p + p.transpose()) * 0.5
}

fn check_covariance(p: &Covariance) -> Result<()> {
    if let Some((idx, value)) = p.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(EstimationError::NumericalInstability {
            reason: format!(
                "non-finite covariance entry ({}, {}) = {}",
                idx % 3,
                idx / 3,
                value
            ),
        });
    }
    for i in 0..3 {
        if p[(i, i)] < 0.0 {
            return Err(EstimationError::NumericalInstability {
                reason: format!("negative variance on state {} = {}", i, p[(i, i)]),
            });
        }
    }
    Ok(())
}

/// PURE FUNCTION: Performs one EKF prediction step.
/// Takes a state and returns the new, predicted state. It has no side effects.
pub fn ekf_predict(
    current_state: &FilterState,
    model: &DiscreteModel,
    process_noise: &ProcessNoise,
    current: f64,
) -> Result<FilterState> {
    let covariance = predict_covariance(&current_state.covariance, model, process_noise)?;
    let x = predict_state(&current_state.x, model, current);

    Ok(FilterState {
        x,
        covariance,
        last_update_timestamp: current_state.last_update_timestamp + model.delta_t,
    })
}
