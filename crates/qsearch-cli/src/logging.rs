//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive for the `-v` count.
fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Pick the filter: an explicit `-v` wins, then the configured level, then `warn`.
pub fn filter_directive(verbose: u8, config: &LoggingConfig) -> String {
    if verbose > 0 {
        return verbosity_filter(verbose).to_string();
    }
    config
        .level
        .clone()
        .unwrap_or_else(|| verbosity_filter(0).to_string())
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init(verbose: u8, config: &LoggingConfig) -> Result<()> {
    let directive = filter_directive(verbose, config);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{directive}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Console => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
