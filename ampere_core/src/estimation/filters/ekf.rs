// ampere_core/src/estimation/filters/ekf.rs

use tracing::trace;

use crate::error::{EstimationError, Result};
use crate::estimation::ekf::ekf_predict;
use crate::estimation::state::{FilterState, ProcessNoise};
use crate::estimation::{FilterPhase, Predict};
use crate::models::{DiscreteDynamics, DiscreteModelCache};
use crate::types::Covariance;

/// An Extended Kalman Filter over the equivalent-circuit state.
///
/// Only the time update exists. The filter owns its dynamics, `Q`, a cache of
/// discretized models and the current [`FilterState`].
#[derive(Debug)]
pub struct ExtendedKalmanFilter {
    /// `None` until [`ExtendedKalmanFilter::initialize`] is called.
    state: Option<FilterState>,
    /// The process noise covariance matrix (Q), modeling uncertainty in the dynamics.
    process_noise: ProcessNoise,
    dynamics: Box<dyn DiscreteDynamics>,
    models: DiscreteModelCache,
}

impl ExtendedKalmanFilter {
    /// Creates an uninitialized filter.
    pub fn new(dynamics: Box<dyn DiscreteDynamics>, process_noise: ProcessNoise) -> Self {
        Self {
            state: None,
            process_noise,
            dynamics,
            models: DiscreteModelCache::new(),
        }
    }

    /// Creates a filter that starts from `initial_state`.
    pub fn with_state(
        dynamics: Box<dyn DiscreteDynamics>,
        process_noise: ProcessNoise,
        initial_state: FilterState,
    ) -> Result<Self> {
        let mut filter = Self::new(dynamics, process_noise);
        filter.initialize(initial_state)?;
        Ok(filter)
    }

    /// Sets (or replaces) the filter's state. The state is validated first.
    pub fn initialize(&mut self, initial_state: FilterState) -> Result<()> {
        initial_state.validate()?;
        self.state = Some(initial_state);
        Ok(())
    }

    pub fn phase(&self) -> FilterPhase {
        if self.state.is_some() {
            FilterPhase::Predicted
        } else {
            FilterPhase::Uninitialized
        }
    }

    pub fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    pub fn dynamics(&self) -> &dyn DiscreteDynamics {
        self.dynamics.as_ref()
    }
}

impl Predict for ExtendedKalmanFilter {
    fn predict(&mut self, delta_t: f64, current: f64) -> Result<&FilterState> {
        let state = self.state.as_ref().ok_or(EstimationError::Uninitialized)?;
        let model = self.models.get_or_build(self.dynamics.as_ref(), delta_t)?;

        // The previous state is only replaced once the whole step succeeded.
        let next = ekf_predict(state, &model, &self.process_noise, current)?;
        trace!(
            delta_t,
            current,
            soc = next.x[0],
            "predicted filter state"
        );
        Ok(self.state.insert(next))
    }

    fn state(&self) -> Option<&FilterState> {
        self.state.as_ref()
    }

    fn reset_covariance(&mut self, covariance: Covariance) -> Result<()> {
        let state = self.state.as_mut().ok_or(EstimationError::Uninitialized)?;
        let reset = FilterState {
            covariance,
            ..state.clone()
        };
        reset.validate()?;
        *state = reset;
        Ok(())
    }
}
