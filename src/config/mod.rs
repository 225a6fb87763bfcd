//! Configuration module for curve settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `CurveConfig`, `MarketConfig`)
//! - YAML loading functionality (`load_config`)
//! - Application constants with environment variable overrides
//! - Logging configuration (`init_logging`)

pub mod constants;
mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{AppConfig, CurveConfig, MarketConfig};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str};

// Re-export logging functions
pub use logging::init_logging;
