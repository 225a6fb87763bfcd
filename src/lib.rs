//! Dataset token bonding curve
//!
//! Pricing and market ledger for tokenized synthetic datasets:
//! - Quadratic bonding curve `price(s) = k * s²` priced by its closed-form integral
//! - Decimal arithmetic, configurable handling of invalid inputs
//! - Trade quotes with fees, price impact and slippage limits
//! - Per-dataset markets reporting price and market cap, persisted as JSON

pub mod config;
pub mod core;
pub mod error;

pub use error::AppError;
