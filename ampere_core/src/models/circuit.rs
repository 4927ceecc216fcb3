// ampere_core/src/models/circuit.rs

use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};
use crate::models::DiscreteDynamics;
use crate::types::{ControlVector, TransitionMatrix};

/// Continuous-time parameters of a second-order Thevenin equivalent circuit:
/// an ohmic resistance in series with two parallel RC branches.
///
/// Units: ohms, farads, and coulombs (ampere-seconds) for `capacity`, which
/// makes the state-of-charge entry a fraction of full charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitParameters {
    /// Ohmic (series) resistance. Not used by the time update, which only
    /// involves the polarization dynamics.
    pub r0: f64,
    pub r1: f64,
    pub c1: f64,
    pub r2: f64,
    pub c2: f64,
    pub capacity: f64,
    /// Operating-temperature bucket (°C) this parameter set was identified at.
    #[serde(default = "default_temperature")]
    pub temperature: i32,
}

fn default_temperature() -> i32 {
    25
}

impl Default for CircuitParameters {
    fn default() -> Self {
        Self {
            r0: 0.01,
            r1: 0.005,
            c1: 2000.0,
            r2: 0.003,
            c2: 3000.0,
            capacity: 2500.0,
            temperature: default_temperature(),
        }
    }
}

impl CircuitParameters {
    /// Rejects any parameter set that would make the discretization produce
    /// `NaN` or `Inf`.
    pub fn validate(&self) -> Result<()> {
        if !self.r0.is_finite() || self.r0 < 0.0 {
            return Err(EstimationError::invalid(
                "r0",
                self.r0,
                "must be finite and non-negative",
            ));
        }
        for (name, value) in [
            ("r1", self.r1),
            ("c1", self.c1),
            ("r2", self.r2),
            ("c2", self.c2),
            ("capacity", self.capacity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EstimationError::invalid(
                    name,
                    value,
                    "must be finite and positive",
                ));
            }
        }
        Ok(())
    }

    /// The RC time constants `(R1*C1, R2*C2)` in seconds.
    pub fn time_constants(&self) -> (f64, f64) {
        (self.r1 * self.c1, self.r2 * self.c2)
    }
}

/// The zero-order-hold discretization of the circuit for one sample interval.
///
/// `x[k+1] = a * x[k] + b * i[k]`, with `i` the load current held over the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscreteModel {
    pub a: TransitionMatrix,
    pub b: ControlVector,
    pub delta_t: f64,
}

/// Discretizes the two-RC-branch circuit for a sample interval `delta_t` (seconds).
///
/// `A = diag(1, exp(-dt/τ1), exp(-dt/τ2))` and
/// `B = [-dt/capacity, R1(1 - exp(-dt/τ1)), R2(1 - exp(-dt/τ2))]`.
pub fn build_discrete_model(params: &CircuitParameters, delta_t: f64) -> Result<DiscreteModel> {
    if !delta_t.is_finite() || delta_t <= 0.0 {
        return Err(EstimationError::invalid(
            "delta_t",
            delta_t,
            "sample interval must be finite and positive",
        ));
    }
    params.validate()?;

    let (tau1, tau2) = params.time_constants();
    let decay1 = (-delta_t / tau1).exp();
    let decay2 = (-delta_t / tau2).exp();

    // 1 - exp(-x) via exp_m1 keeps precision when dt is much shorter than tau.
    let gain1 = -(-delta_t / tau1).exp_m1();
    let gain2 = -(-delta_t / tau2).exp_m1();

    let a = TransitionMatrix::new(
        1.0, 0.0, 0.0, //
        0.0, decay1, 0.0, //
        0.0, 0.0, decay2,
    );
    let b = ControlVector::new(-delta_t / params.capacity, params.r1 * gain1, params.r2 * gain2);

    check_finite(&a, &b, params, delta_t)?;
    Ok(DiscreteModel { a, b, delta_t })
}

/// Finite, positive inputs can still overflow, e.g. a subnormal `capacity`.
fn check_finite(
    a: &TransitionMatrix,
    b: &ControlVector,
    params: &CircuitParameters,
    delta_t: f64,
) -> Result<()> {
    let drivers = [
        ("capacity", params.capacity),
        ("r1", params.r1),
        ("r2", params.r2),
    ];
    if let Some(row) = b.iter().position(|v| !v.is_finite()) {
        let (name, value) = drivers[row];
        return Err(EstimationError::invalid(
            name,
            value,
            "discretization is not finite for this sample interval",
        ));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(EstimationError::invalid(
            "delta_t",
            delta_t,
            "discretization is not finite for this sample interval",
        ));
    }
    Ok(())
}

impl DiscreteDynamics for CircuitParameters {
    fn discretize(&self, delta_t: f64) -> Result<DiscreteModel> {
        build_discrete_model(self, delta_t)
    }
}
