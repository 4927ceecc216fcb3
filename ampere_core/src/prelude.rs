// ampere_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::Predict;
pub use crate::models::DiscreteDynamics;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::estimation::{FilterPhase, FilterState, ProcessNoise};
pub use crate::messages::{Estimate, MeasurementSample};
pub use crate::models::{CircuitParameters, DiscreteModel, DiscreteModelCache};
pub use crate::types::{ControlVector, Covariance, StateVariable, StateVector, TransitionMatrix};

// --- Estimation Algorithms ---
pub use crate::estimation::ekf::{ekf_predict, predict_covariance, predict_state};
pub use crate::estimation::filters::ExtendedKalmanFilter;
pub use crate::estimation::sequence::{
    run_sequence, ControlAlignment, InstabilityPolicy, SequenceOptions,
};
pub use crate::models::build_discrete_model;

// --- Errors ---
pub use crate::error::EstimationError;
pub use crate::time::{parse_timestamp, seconds_between, TimeError};
