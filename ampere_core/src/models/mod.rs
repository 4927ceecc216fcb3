// ampere_core/src/models/mod.rs

use std::collections::HashMap;
use std::fmt::Debug;

use tracing::debug;

use crate::error::Result;

pub mod circuit;

pub use circuit::{build_discrete_model, CircuitParameters, DiscreteModel};

/// A continuous-time cell model that can be turned into a discrete-time
/// linear system for a given sample interval.
///
/// The estimator only ever talks to this trait, so a different circuit
/// topology can be substituted without touching the filter.
pub trait DiscreteDynamics: Debug + Send + Sync {
    /// Returns the discrete `(A, B)` pair for a sample interval of `delta_t` seconds.
    fn discretize(&self, delta_t: f64) -> Result<DiscreteModel>;
}

/// Upper bound on the number of distinct intervals kept before the cache is flushed.
const MAX_CACHED_INTERVALS: usize = 32;

/// Discrete models keyed by the exact bit pattern of their sample interval.
///
/// Logs sampled at a fixed rate hit the same entry on every step; irregular
/// logs rebuild only when an interval is seen for the first time.
#[derive(Debug, Clone, Default)]
pub struct DiscreteModelCache {
    models: HashMap<u64, DiscreteModel>,
}

impl DiscreteModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model for `delta_t`, discretizing `dynamics` on a miss.
    /// A failed discretization is not cached.
    pub fn get_or_build(
        &mut self,
        dynamics: &dyn DiscreteDynamics,
        delta_t: f64,
    ) -> Result<DiscreteModel> {
        let key = delta_t.to_bits();
        if let Some(model) = self.models.get(&key) {
            return Ok(*model);
        }

        let model = dynamics.discretize(delta_t)?;
        if self.models.len() >= MAX_CACHED_INTERVALS {
            self.models.clear();
        }
        debug!(delta_t, "discretized circuit model for new sample interval");
        self.models.insert(key, model);
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drops every cached model, e.g. after the circuit parameters change.
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
