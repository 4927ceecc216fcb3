// ampere_sim/src/logging.rs

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `level` takes precedence over `RUST_LOG`; with neither set, `info` is used.
pub fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
