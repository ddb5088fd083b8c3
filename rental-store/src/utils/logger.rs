//! Logging Infrastructure
//!
//! Structured logging setup for the store binary and tools.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "rental-store";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON formatting and file output
///
/// `RUST_LOG` wins over `log_level` when set. File output goes to a daily
/// rolling file inside `log_dir`, only when that directory exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir.map(Path::new).filter(|dir| dir.exists());

    let result = match (file_dir, json) {
        (Some(dir), true) => subscriber
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (Some(dir), false) => subscriber
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };

    // A global subscriber may already be installed (tests, embedding apps)
    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {}", e);
    }
}
