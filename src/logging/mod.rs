//! Application logging functionality
//!
//! Logs go to stderr. With `--log-file` they are also appended to a daily
//! file under the user config directory, which is handy for long watch
//! sessions.

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "iconforge.log";

/// Get the path to the iconforge config directory
fn config_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
    config_dir.join("iconforge")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Get the path of today's log file, as named by the rolling appender
pub fn current_log_file() -> PathBuf {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{LOG_FILE_PREFIX}.{date}"))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Default filter directive for a `-v` count; `RUST_LOG` overrides it
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "iconforge=info",
        1 => "iconforge=debug",
        _ => "iconforge=trace",
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init(verbosity: u8, log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());

    if !log_to_file {
        tracing_subscriber::registry()
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    }

    initialize_logs_directory()?;
    let appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        "=== iconforge started at {} ===",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    tracing::info!("Logs written to: {:?}", current_log_file());

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "iconforge=info");
        assert_eq!(default_directive(1), "iconforge=debug");
        assert_eq!(default_directive(5), "iconforge=trace");
    }

    #[test]
    fn test_log_file_lives_in_logs_dir() {
        let file = current_log_file();
        assert_eq!(file.parent(), Some(logs_dir().as_path()));
        assert!(file
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(LOG_FILE_PREFIX));
    }
}
