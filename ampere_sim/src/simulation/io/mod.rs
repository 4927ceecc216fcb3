// ampere_sim/src/simulation/io/mod.rs

pub mod ingest;
pub mod report;

pub use ingest::IngestError;
