//! Core module - Bonding curve pricing, quotes, and dataset markets
//!
//! # Module Architecture
//!
//! This module uses **explicit re-exports** instead of glob exports (`pub use module::*`)
//! to provide better API visibility and prevent accidental public API changes.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{BondingCurve, QuoteEngine, DatasetMarket};
//! ```

pub mod book;
pub mod curve;
pub mod errors;
pub mod input;
pub mod market;
pub mod quote;

// Explicit re-exports for curve module
pub use curve::{buy_cost, sell_refund, BondingCurve, DEFAULT_CURVE_K};

// Explicit re-exports for errors module
pub use errors::{CurveError, CurveResult};

// Explicit re-exports for input module
pub use input::InputPolicy;

// Explicit re-exports for quote module
pub use quote::{QuoteEngine, TradeQuote, TradeSide, MAX_FEE_BPS};

// Explicit re-exports for market and book modules
pub use book::MarketBook;
pub use market::{DatasetMarket, MarketSnapshot, TradeReceipt};
