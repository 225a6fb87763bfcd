//! Logging configuration module
//!
//! Provides configurable JSON/Pretty logging output on stderr, so CLI
//! results printed to stdout stay machine-readable.
//!
//! # Usage
//! ```rust,ignore
//! use dataset_curve::config::logging::init_logging;
//! init_logging();
//! ```
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `json` (default) or `pretty`
//! - `RUST_LOG`: Log level filter (default: `dataset_curve=info`)

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "dataset_curve=info";

/// Flag to track if logging has been initialized (prevents double-init)
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Output format selected by `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` falls back to JSON
    pub fn parse(value: &str) -> Self {
        match value {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Json)
    }
}

/// Initialize logging with configurable format
///
/// Reads `LOG_FORMAT` from environment:
/// - `json` (default): Machine-parseable JSON output
/// - `pretty`: Human-readable output for development
///
/// Also respects `RUST_LOG` for log level filtering. Subsequent calls are
/// no-ops.
pub fn init_logging() {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    // NOTE: `init_logging()` itself is not unit tested: tracing_subscriber can
    // only be installed once per process. Format selection is tested instead.
    use super::*;

    #[test]
    fn test_pretty_format_detection() {
        let test_cases = vec![
            ("pretty", LogFormat::Pretty),
            ("json", LogFormat::Json),
            ("PRETTY", LogFormat::Json), // Case sensitive
            ("", LogFormat::Json),
            ("other", LogFormat::Json),
        ];

        for (input, expected) in test_cases {
            assert_eq!(LogFormat::parse(input), expected, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_env_filter_fallback() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_LEVEL);
        assert!(filter.is_ok());
        assert!(DEFAULT_LOG_LEVEL.starts_with("dataset_curve"));
    }
}
