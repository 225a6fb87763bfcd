//! Pricing and market error types
//!
//! All curve, quote and market failures are reported through `CurveError`
//! so callers can match on the exact condition (e.g. surface
//! `InsufficientSupply` to the end user, reject `SlippageExceeded` trades).

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the bonding curve, quotes and market ledger
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Selling more tokens than are currently issued
    #[error("Insufficient supply: cannot sell {requested} from supply {supply}")]
    InsufficientSupply { supply: Decimal, requested: Decimal },

    /// Refund would exceed the collateral held by the market
    #[error("Insufficient reserve: refund {refund} exceeds reserve {reserve}")]
    InsufficientReserve { reserve: Decimal, refund: Decimal },

    /// Input rejected by the strict input policy
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Curve, fee or market parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Result does not fit in a Decimal
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Stateful trades need a positive amount
    #[error("Trade amount must be greater than zero")]
    ZeroAmount,

    /// Trade above the configured per-trade limit
    #[error("Trade amount {amount} exceeds maximum {max}")]
    TradeTooLarge { amount: Decimal, max: Decimal },

    /// Quoted total crossed the caller's limit
    #[error("Slippage exceeded: quoted {quoted}, limit {limit}")]
    SlippageExceeded { quoted: Decimal, limit: Decimal },

    /// No market registered under this dataset id
    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    /// A market with this dataset id is already open
    #[error("Market already exists: {0}")]
    MarketExists(String),
}

/// Result type alias for curve and market operations
pub type CurveResult<T> = std::result::Result<T, CurveError>;
