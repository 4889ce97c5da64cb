//! Logging setup (tracing + tracing-subscriber)

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set, otherwise `info`. Unless `solver_output` is
/// requested, the MILP backend's own log records are dropped.
pub fn build_filter(solver_output: bool) -> Result<EnvFilter> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if solver_output {
        Ok(filter)
    } else {
        Ok(filter.add_directive("microlp=off".parse()?))
    }
}

/// Install the global subscriber, writing to stderr
pub fn init_logging(format: LogFormat, solver_output: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(solver_output)?)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
