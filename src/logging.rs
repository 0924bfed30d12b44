//! Logging configuration using the tracing ecosystem.
//!
//! Command results go to stdout, so logs are written to a daily-rotated file
//! instead. Each run opens with a line naming the command being executed,
//! which makes it easy to find the requests belonging to one invocation.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Log filter used when RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "simplenote=info,warn";

/// Log filter for `--verbose`: client spans and per-page pagination events.
const VERBOSE_LOG_FILTER: &str = "simplenote=debug,reqwest=info,warn";

/// Pick the filter directive. `RUST_LOG` always wins over `--verbose`.
fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Initialize the logging system for one CLI invocation.
///
/// Logs are stored under the platform-specific local data directory, e.g.
/// `~/.local/share/simplenote/logs/simplenote.log.YYYY-MM-DD` on Linux.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use simplenote::logging;
///
/// logging::init("list", true).expect("Failed to initialize logging");
/// ```
pub fn init(command: &str, verbose: bool) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "simplenote.log");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        command,
        verbose,
        "simplenote invoked"
    );
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

/// Get the log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("simplenote").join("logs"))
}

/// Get the path where logs are stored, for pointing users at them.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}
