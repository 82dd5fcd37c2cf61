//! Tracing setup: console output plus a daily log file
//!
//! Files are named `prime_lattice.log.YYYY-MM-DD` inside the log directory.

use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "info,prime_lattice=debug";

pub const LOG_FILE_PREFIX: &str = "prime_lattice.log";

/// RUST_LOG if it parses, `DEFAULT_FILTER` otherwise.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it for the whole run.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let console = fmt::layer().with_target(true).with_file(true).with_line_number(true);
    let file = fmt::layer().with_writer(file_writer).with_target(true).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console)
        .with(file)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!(dir = %log_dir.display(), "Logging initialized");
    Ok(guard)
}

/// Log an error with context
#[macro_export]
macro_rules! log_error {
    ($msg:expr) => {
        tracing::error!(error = %$msg, "Error occurred");
    };
    ($msg:expr, $($field:tt)*) => {
        tracing::error!(error = %$msg, $($field)*, "Error occurred");
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn init_creates_dir_and_installs_once() {
        let dir = std::env::temp_dir().join(format!("prime_lattice_logs_{}", std::process::id()));
        let first = init_logging(&dir);
        assert!(dir.is_dir());
        assert!(first.is_ok());
        assert!(init_logging(&dir).is_err());
        drop(first);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
