use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::PolarisConfig;

/// Daily files are named `polaris.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "polaris";

/// Initializes the logging system with file + console output.
/// Returns a guard that must be kept alive for the duration of the app.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &PolarisConfig) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(&PolarisConfig::logs_dir()?)?;

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(file_layer(writer))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

/// File-only logging under `logs_dir`, for tests and embedding hosts that
/// own the console. `level` is a config level such as `"info"`.
pub fn init_logging_to_dir(logs_dir: &Path, level: &str) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(logs_dir)?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer(writer))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

fn file_writer(logs_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

fn file_layer<S>(writer: NonBlocking) -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(false)
        .with_writer(writer)
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)))
}

/// Base level for everything, with the wallet crates one notch chattier at
/// `info` so lifecycle transitions show up by default.
fn default_filter(level: &str) -> String {
    if level == "info" {
        "info,polaris_core=debug,polaris_wallet=debug".into()
    } else {
        level.to_string()
    }
}
