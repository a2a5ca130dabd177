//! File logging.
//!
//! The terminal belongs to the game, so log lines go to a daily-rolling file
//! instead of stderr.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "terminal-mystery.log";
const DEFAULT_FILTER: &str = "warn,tm_core=debug,tm_store=debug,tm_oracle=debug,tm_engine=debug,terminal_mystery=debug";

/// Overrides the log directory.
const LOG_DIR_ENV: &str = "TERMINAL_MYSTERY_LOG_DIR";

/// Where log files are written.
fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join("terminal-mystery").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Returns the appender guard, which must live until exit so buffered lines
/// are flushed. Logging is skipped if the log directory is unusable.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    tracing::debug!(dir = %dir.display(), "logging initialized");
    Some(guard)
}
