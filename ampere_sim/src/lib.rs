// ampere_sim/src/lib.rs

//! The thin driver around `ampere_core`: configuration, measurement-log
//! ingestion, reporting and the `ampere` command-line tool.

// This prelude is for convenience for other files WITHIN the ampere_sim crate.
pub mod prelude;

pub mod cli;
pub mod logging;
pub mod simulation;
