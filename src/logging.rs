use crate::error::{ExplainError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes the application's logging system with the specified log level
///
/// `RUST_LOG` takes precedence over `log_level` when set.
/// Valid log levels are: error, warn, info, debug, trace
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(parse_log_level(log_level))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| ExplainError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Filter directives for a base level; HTTP plumbing stays one notch quieter
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("{level},hyper=warn,reqwest=warn,tower_http=info")
}

/// Parses a log level string into a tracing `Level`
///
/// Returns the corresponding level, defaulting to Info for invalid strings
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO, // Default fallback
    }
}
