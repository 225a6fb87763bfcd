//! Configuration types for curve and market settings
//!
//! This module defines all configuration structs that are loaded from YAML
//! and turned into a `QuoteEngine` and the initial set of dataset markets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::curve::{BondingCurve, DEFAULT_CURVE_K};
use crate::core::input::InputPolicy;
use crate::core::quote::{QuoteEngine, MAX_FEE_BPS};
use crate::error::AppError;

fn default_k() -> Decimal {
    DEFAULT_CURVE_K
}

fn default_max_trade_amount() -> Decimal {
    dec!(1000000)
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Bonding curve and trading parameters shared by every market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveConfig {
    /// Curve constant in `price(s) = k * s²`
    #[serde(default = "default_k")]
    pub k: Decimal,
    /// Trading fee in basis points (100 = 1%)
    #[serde(default)]
    pub fee_bps: u16,
    /// Handling of missing / non-numeric inputs
    #[serde(default)]
    pub input_policy: InputPolicy,
    /// Largest amount accepted in a single trade
    #[serde(default = "default_max_trade_amount")]
    pub max_trade_amount: Decimal,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            fee_bps: 0,
            input_policy: InputPolicy::default(),
            max_trade_amount: default_max_trade_amount(),
        }
    }
}

impl CurveConfig {
    /// Validate curve configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        // Rule: k > 0
        if self.k <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "curve.k must be > 0 (got {})",
                self.k
            )));
        }

        // Rule: fee within 0..=MAX_FEE_BPS
        if self.fee_bps > MAX_FEE_BPS {
            return Err(AppError::Config(format!(
                "curve.fee_bps must be <= {} (got {})",
                MAX_FEE_BPS, self.fee_bps
            )));
        }

        // Rule: max_trade_amount > 0
        if self.max_trade_amount <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "curve.max_trade_amount must be > 0 (got {})",
                self.max_trade_amount
            )));
        }

        Ok(())
    }

    /// Build the quote engine described by this configuration
    pub fn engine(&self) -> Result<QuoteEngine, AppError> {
        let curve = BondingCurve::new(self.k)?;
        Ok(QuoteEngine::new(curve, self.fee_bps)?)
    }
}

/// A dataset market opened at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketConfig {
    /// Dataset identifier (e.g., "synthetic-weather")
    pub id: String,
    /// Human-readable dataset name
    #[serde(default)]
    pub name: String,
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Curve and trading settings
    #[serde(default)]
    pub curve: CurveConfig,
    /// Markets opened in a new book, or added to a saved book that lacks them
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.curve.validate()?;

        let mut seen = std::collections::HashSet::new();
        for market in &self.markets {
            let id = market.id.trim();

            // Rule: market id cannot be empty
            if id.is_empty() {
                return Err(AppError::Config("Market id cannot be empty".to_string()));
            }

            // Rule: market ids are unique after trimming
            if !seen.insert(id) {
                return Err(AppError::Config(format!("Duplicate market id '{}'", id)));
            }
        }

        Ok(())
    }

    /// Apply environment overrides from `config::constants`
    pub fn with_env_overrides(mut self) -> Result<Self, AppError> {
        if let Some(k) = super::constants::curve_k_override() {
            self.curve.k = k;
        }
        self.validate()?;
        Ok(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> AppConfig {
        AppConfig {
            curve: CurveConfig::default(),
            markets: vec![
                MarketConfig {
                    id: "synthetic-weather".to_string(),
                    name: "Synthetic weather".to_string(),
                },
                MarketConfig {
                    id: "retail-baskets".to_string(),
                    name: "Retail baskets".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_curve_config() {
        let curve = CurveConfig::default();
        assert_eq!(curve.k, dec!(0.0001));
        assert_eq!(curve.fee_bps, 0);
        assert_eq!(curve.input_policy, InputPolicy::Coerce);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn test_zero_k_rejected() {
        let mut config = create_valid_config();
        config.curve.k = Decimal::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("curve.k must be > 0"));
    }

    #[test]
    fn test_fee_above_max_rejected() {
        let mut config = create_valid_config();
        config.curve.fee_bps = 1001;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("curve.fee_bps must be <= 1000"));
    }

    #[test]
    fn test_non_positive_max_trade_rejected() {
        let mut config = create_valid_config();
        config.curve.max_trade_amount = dec!(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_market_id_rejected() {
        let mut config = create_valid_config();
        config.markets[0].id = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Market id cannot be empty"));
    }

    #[test]
    fn test_duplicate_market_id_rejected() {
        let mut config = create_valid_config();
        config.markets[1].id = "synthetic-weather".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate market id 'synthetic-weather'"));
    }

    #[test]
    fn test_padded_duplicate_market_id_rejected() {
        let mut config = create_valid_config();
        config.markets[1].id = " synthetic-weather ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate market id 'synthetic-weather'"));
    }

    #[test]
    fn test_engine_from_config() {
        let mut curve = CurveConfig::default();
        curve.fee_bps = 50;
        let engine = curve.engine().unwrap();
        assert_eq!(engine.fee_bps(), 50);
        assert_eq!(engine.curve().k(), dec!(0.0001));
    }
}
