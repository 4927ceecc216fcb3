// ampere_sim/src/prelude.rs

// Re-export the entire ampere_core prelude so you can easily access
// pure types like `CircuitParameters`, `FilterState`, `Predict`, etc.
pub use ampere_core::prelude::*;

// Re-export common driver-specific types for easy access.
pub use crate::cli::{AlignmentArg, Cli};
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{load_config, ConfigError};
pub use crate::simulation::io::ingest::{load_samples, read_samples, IngestError, IngestOptions};
pub use crate::simulation::io::report::{format_summary, write_trace, write_trace_file};
pub use crate::simulation::run::{build_filter, run, run_with_filter, RunError, RunOutput};
