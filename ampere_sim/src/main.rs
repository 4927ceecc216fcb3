use ampere_sim::cli::Cli;
use ampere_sim::logging::init_logging;
use ampere_sim::simulation::config::load_config;
use ampere_sim::simulation::io::report::{format_summary, write_trace_file};
use ampere_sim::simulation::run::run;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_overrides(&mut config);

    let output = run(&config, &cli.log)
        .with_context(|| format!("estimating state from {}", cli.log.display()))?;

    if let Some(path) = &cli.output {
        write_trace_file(path, &output.samples, &output.estimates)
            .with_context(|| format!("writing trace to {}", path.display()))?;
        info!("Wrote estimate trace to {}", path.display());
    }

    match output.final_estimate() {
        Some(estimate) => println!("{}", format_summary(estimate)),
        None => println!("measurement log contains no samples"),
    }

    Ok(())
}
