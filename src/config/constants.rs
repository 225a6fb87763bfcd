//! Application-wide constants and configuration defaults
//!
//! Values can be overridden via environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

pub use crate::core::quote::MAX_FEE_BPS;

/// Default location of the YAML configuration
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Default location of the persisted market book
pub const DEFAULT_STATE_FILE: &str = "data/markets.json";

// =============================================================================
// Curve
// =============================================================================

/// Curve constant override (default: none, use config)
///
/// Environment variable: `CURVE_K`. Ignored unless it parses to a positive
/// decimal.
pub fn curve_k_override() -> Option<Decimal> {
    std::env::var("CURVE_K")
        .ok()
        .and_then(|s| Decimal::from_str(s.trim()).ok())
        .filter(|k| *k > Decimal::ZERO)
}

/// Decimal places shown in CLI output (default: 8)
///
/// Environment variable: `QUOTE_DECIMAL_PLACES`
pub fn quote_decimal_places() -> u32 {
    std::env::var("QUOTE_DECIMAL_PLACES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8)
}

// =============================================================================
// Files
// =============================================================================

/// Configuration file path (default: `config.yaml`)
///
/// Environment variable: `CURVE_CONFIG`
pub fn config_path() -> PathBuf {
    std::env::var("CURVE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Market book state file (default: `data/markets.json`)
///
/// Environment variable: `MARKET_STATE_FILE`
pub fn market_state_file() -> PathBuf {
    std::env::var("MARKET_STATE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print all configuration values (for debugging/startup logs)
pub fn log_configuration() {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("  - Curve k override: {:?}", curve_k_override());
    tracing::info!("  - Quote decimal places: {}", quote_decimal_places());
    tracing::info!("  - Max fee: {} bps", MAX_FEE_BPS);
    tracing::info!("  - Config path: {}", config_path().display());
    tracing::info!("  - State file: {}", market_state_file().display());
    tracing::info!("==================================");
}
