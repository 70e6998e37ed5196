//! Logging configuration for curata
//!
//! Terminal output and optional file logging using tracing.

use crate::{Error, Result};
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging
/// * `log_file` - Optional path to write logs to a file
///
/// The `RUST_LOG` environment variable overrides the verbose flag.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "curata_engine={level},curata_template={level},curata_config={level},curata_core={level}"
            ))
        })
        .map_err(|e| Error::Logging(e.to_string()))?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true)
        .with_filter(env_filter);

    match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|e| Error::Logging(format!("cannot open {}: {e}", log_path.display())))?;

            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .with_filter(
                    EnvFilter::try_new("debug").map_err(|e| Error::Logging(e.to_string()))?,
                );

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry().with(stdout_layer).init();
        }
    }

    Ok(())
}
