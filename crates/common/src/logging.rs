//! Logging configuration for tracewalk components
//!
//! Provides centralized logging setup with:
//! - Structured console output on stderr, so stdout stays free for rendered steps
//! - File-only logging for the full-screen terminal UI
//! - Environment variable support (RUST_LOG)
//! - Default INFO level

use eyre::{eyre, Result};
use std::{env, fs, io, path::PathBuf, sync::Once};
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Name of the directory (under the system temp dir) holding log files
const LOG_DIR_NAME: &str = "tracewalk-logs";

/// Build the environment filter, falling back to `default_level` when RUST_LOG is unset
fn env_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| eyre!("Failed to create environment filter: {}", e))
}

/// Initialize console logging for tracewalk components
///
/// Log lines go to stderr with timestamps, targets and source locations.
/// RUST_LOG overrides the default INFO level.
///
/// # Arguments
/// * `component_name` - Name of the component (e.g., "tracewalk")
///
/// # Examples
/// ```rust
/// use tracewalk_common::logging;
///
/// fn main() -> eyre::Result<()> {
///     logging::init_logging("tracewalk")?;
///     tracing::info!("Application started");
///     Ok(())
/// }
/// ```
pub fn init_logging(component_name: &str) -> Result<()> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter("info")?)
        .with(console_layer)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(component = component_name, "Logging initialized with console output");
    log_environment_info(component_name);

    Ok(())
}

/// Initialize file-only logging, for components that own the terminal
///
/// Returns the directory the log files are written to, so the caller can tell
/// the operator where to look.
pub fn init_file_only_logging(component_name: &str) -> Result<PathBuf> {
    let log_dir = create_log_directory(component_name)?;

    let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    // The subscriber lives for the rest of the process, so must the writer guard
    std::mem::forget(guard);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(false)
        .with_writer(non_blocking_appender);

    tracing_subscriber::registry()
        .with(env_filter("debug")?)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(
        component = component_name,
        log_dir = %log_dir.display(),
        "Logging initialized with file output only"
    );
    log_environment_info(component_name);

    Ok(log_dir)
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let log_dir = env::temp_dir().join(LOG_DIR_NAME).join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Log useful environment information
fn log_environment_info(component_name: &str) {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let args: Vec<String> = env::args().collect();

    tracing::debug!(
        component = component_name,
        rust_log = %rust_log,
        args = ?args,
        "Environment information"
    );
}

/// Initialize simple logging (console only, compact formatting)
///
/// This is useful for tests or simple utilities that don't need
/// the full logging setup.
pub fn init_simple_logging(level: Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level.as_str())?)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .map_err(|e| eyre!("Failed to initialize simple logging: {}", e))?;

    Ok(())
}

// Global test logging initialization - ensures logging is only set up once across all tests
static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times without crashing
///
/// Uses `std::sync::Once` so initialization happens only once per test process.
/// Defaults to INFO but respects RUST_LOG.
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        let default_level = default_level.unwrap_or(Level::INFO);
        // A subscriber may already be installed by another harness, which is fine
        let _ = init_simple_logging(default_level);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, error, info, warn};

    #[test]
    #[serial]
    fn test_logging_functions_work() {
        ensure_test_logging(None);

        info!("Test info message");
        warn!("Test warning message");
        debug!("Test debug message");
        error!("Test error message");
    }

    #[test]
    fn test_log_directory_creation() {
        let log_dir = create_log_directory("test-component").unwrap();

        assert!(log_dir.exists());
        assert!(log_dir.to_string_lossy().contains(LOG_DIR_NAME));
        assert!(log_dir.to_string_lossy().contains("test-component"));
    }

    #[test]
    fn test_env_filter_falls_back_to_default_level() {
        let filter = env_filter("warn").unwrap();
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    #[serial]
    fn test_repeated_initialization_is_graceful() {
        ensure_test_logging(None);

        // A subscriber is already installed, so both calls report an error instead of panicking
        assert!(init_logging("test-console").is_err());
        assert!(init_simple_logging(Level::DEBUG).is_err());

        info!("Test logging after repeated init attempts");
    }
}
