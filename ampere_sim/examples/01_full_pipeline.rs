// ampere_sim/examples/01_full_pipeline.rs

//! A full end-to-end estimation example.
//!
//! This example demonstrates how to:
//! 1. Load the cell configuration from a TOML file.
//! 2. Build the discretized circuit model and an EKF from it.
//! 3. Ingest the bundled measurement log.
//! 4. Run the predict-only estimation loop and print the result.
//!
//! To run this example (from the workspace root):
//! `cargo run -p ampere_sim --example 01_full_pipeline`

use std::path::Path;

use ampere_sim::prelude::*;
use anyhow::{Context, Result};

fn main() -> Result<()> {
    ampere_sim::logging::init_logging(Some("info"))?;

    // --- 1. Load Configuration ---
    let config_path = Path::new("assets/cells/default.toml");
    let config = load_config(Some(config_path)).context("loading cell configuration")?;

    // --- 2. Inspect the Discrete Model ---
    let params = config.cell.parameters()?;
    let model = build_discrete_model(&params, 1.0)?;
    println!("A (dt = 1 s):{}", model.a);
    println!("B (dt = 1 s):{}", model.b);

    // --- 3 & 4. Ingest and Estimate ---
    let log_path = Path::new("assets/data/sample_discharge.csv");
    let output = run(&config, log_path)?;

    for estimate in output.estimates.iter().step_by(30) {
        println!("{}", format_summary(estimate));
    }
    if let Some(last) = output.final_estimate() {
        println!("{}", format_summary(last));
    }

    Ok(())
}
