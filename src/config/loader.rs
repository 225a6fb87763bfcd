//! Configuration loader for YAML files
//!
//! Both entry points parse into `AppConfig` and run `AppConfig::validate`, so
//! a config that loads is one `MarketBook::from_config` can open.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;

use super::types::AppConfig;

/// Load and validate the curve/market configuration at `path`
///
/// # Errors
/// `AppError::Config` when the file is missing, is not valid YAML for the
/// schema, or breaks a validation rule (e.g. `curve.k <= 0`).
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use dataset_curve::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"))?;
/// let book = MarketBook::from_config(&config)?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    let yaml = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::Config(format!("Configuration file not found: {}", path.display()))
        }
        _ => AppError::Io(e),
    })?;
    parse(&yaml, &format!(" in '{}'", path.display()))
}

/// Load and validate configuration from YAML text
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    parse(yaml_content, "")
}

fn parse(yaml: &str, origin: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml)
        .map_err(|e| AppError::Config(format!("YAML parse error{}: {}", origin, e)))?;
    config.validate()?;

    debug!(
        k = %config.curve.k,
        fee_bps = config.curve.fee_bps,
        input_policy = %config.curve.input_policy,
        markets = config.markets.len(),
        "Configuration parsed"
    );
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
