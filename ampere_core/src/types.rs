// ampere_core/src/types.rs

use nalgebra::{Matrix3, Vector3};

// --- Core Type Aliases ---
/// The filter state `x = [soc, v1, v2]`.
pub type StateVector = Vector3<f64>;
/// A 3x3 covariance (`P` or `Q`).
pub type Covariance = Matrix3<f64>;
/// The discrete state-transition matrix `A`.
pub type TransitionMatrix = Matrix3<f64>;
/// The discrete control matrix `B` (one input: the load current).
pub type ControlVector = Vector3<f64>;

/// Index of each variable in the state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVariable {
    /// State-of-charge proxy, a pure integrator of the load current.
    StateOfCharge,
    /// Polarization voltage over the first RC branch.
    Branch1Voltage,
    /// Polarization voltage over the second RC branch.
    Branch2Voltage,
}

impl StateVariable {
    pub const LAYOUT: [StateVariable; 3] = [
        StateVariable::StateOfCharge,
        StateVariable::Branch1Voltage,
        StateVariable::Branch2Voltage,
    ];

    pub fn index(self) -> usize {
        match self {
            StateVariable::StateOfCharge => 0,
            StateVariable::Branch1Voltage => 1,
            StateVariable::Branch2Voltage => 2,
        }
    }
}
