//! Market book: every dataset market, keyed by dataset id
//!
//! The book is persisted as pretty-printed JSON so the CLI can apply trades
//! across invocations. Markets are opened from configuration the first time
//! the book is created. A saved book is validated on load and then brought
//! in line with the current configuration, so quotes and trades always use
//! the same engine.
//!
//! Dataset ids are trimmed on every lookup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::{CurveError, CurveResult};
use super::market::{DatasetMarket, MarketSnapshot, TradeReceipt};
use super::quote::QuoteEngine;
use crate::config::AppConfig;
use crate::error::AppError;

/// All open dataset markets sharing one quote engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketBook {
    engine: QuoteEngine,
    max_trade_amount: Decimal,
    markets: BTreeMap<String, DatasetMarket>,
}

impl MarketBook {
    /// Create an empty book
    pub fn new(engine: QuoteEngine, max_trade_amount: Decimal) -> Self {
        Self {
            engine,
            max_trade_amount,
            markets: BTreeMap::new(),
        }
    }

    /// Create a book with every market listed in the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let mut book = Self::new(config.curve.engine()?, config.curve.max_trade_amount);
        for market in &config.markets {
            book.open_market(&market.id, &market.name)?;
        }
        Ok(book)
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Open an empty market for a dataset
    pub fn open_market(&mut self, dataset_id: &str, name: &str) -> CurveResult<&DatasetMarket> {
        let id = dataset_id.trim();
        if self.markets.contains_key(id) {
            return Err(CurveError::MarketExists(id.to_string()));
        }

        let market = DatasetMarket::new(id, name, self.engine, self.max_trade_amount)?;
        info!(dataset_id = %id, name = %name, "Market opened");
        let market = self.markets.entry(id.to_string()).or_insert(market);
        Ok(&*market)
    }

    pub fn market(&self, dataset_id: &str) -> CurveResult<&DatasetMarket> {
        let id = dataset_id.trim();
        self.markets
            .get(id)
            .ok_or_else(|| CurveError::UnknownMarket(id.to_string()))
    }

    fn market_mut(&mut self, dataset_id: &str) -> CurveResult<&mut DatasetMarket> {
        let id = dataset_id.trim();
        self.markets
            .get_mut(id)
            .ok_or_else(|| CurveError::UnknownMarket(id.to_string()))
    }

    /// Buy on the named market
    pub fn buy(
        &mut self,
        dataset_id: &str,
        amount: Decimal,
        max_total: Option<Decimal>,
    ) -> CurveResult<TradeReceipt> {
        self.market_mut(dataset_id)?.buy(amount, max_total)
    }

    /// Sell on the named market
    pub fn sell(
        &mut self,
        dataset_id: &str,
        amount: Decimal,
        min_total: Option<Decimal>,
    ) -> CurveResult<TradeReceipt> {
        self.market_mut(dataset_id)?.sell(amount, min_total)
    }

    /// Snapshots of every market, ordered by dataset id
    pub fn snapshots(&self) -> CurveResult<Vec<MarketSnapshot>> {
        self.markets.values().map(DatasetMarket::snapshot).collect()
    }

    /// Write the book as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), markets = self.markets.len(), "Market book saved");
        Ok(())
    }

    /// Read a book previously written by `save`
    ///
    /// Curve and fee settings are checked while parsing; limits, supplies and
    /// map keys are checked afterwards.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        let mut book: Self = serde_json::from_str(&content)?;
        book.validate()?;
        info!(path = %path.display(), markets = book.markets.len(), "Market book loaded");
        Ok(book)
    }

    /// Load the saved book, or build a fresh one from configuration
    ///
    /// A loaded book is reconciled with `config` before it is returned.
    pub fn load_or_default(path: &Path, config: &AppConfig) -> Result<Self, AppError> {
        if path.exists() {
            let mut book = Self::load(path)?;
            book.reconcile(config)?;
            Ok(book)
        } else {
            info!(path = %path.display(), "No saved market book, opening configured markets");
            Self::from_config(config)
        }
    }

    /// Apply the configured engine and trade limit, and open configured
    /// markets the book does not have yet
    ///
    /// Fails if the curve changed while a market holds supply. Markets that
    /// are no longer configured keep trading.
    pub fn reconcile(&mut self, config: &AppConfig) -> Result<(), AppError> {
        config.validate()?;
        let engine = config.curve.engine()?;
        let max_trade_amount = config.curve.max_trade_amount;

        if engine != self.engine || max_trade_amount != self.max_trade_amount {
            // Check every market first so a failure leaves the book unchanged
            let mut updated = self.markets.clone();
            for market in updated.values_mut() {
                market.reconfigure(engine, max_trade_amount)?;
            }
            info!(
                k = %engine.curve().k(),
                fee_bps = engine.fee_bps(),
                max_trade_amount = %max_trade_amount,
                "Market book engine updated from configuration"
            );
            self.markets = updated;
            self.engine = engine;
            self.max_trade_amount = max_trade_amount;
        }

        for market in &config.markets {
            if !self.markets.contains_key(market.id.trim()) {
                self.open_market(&market.id, &market.name)?;
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> CurveResult<()> {
        if self.max_trade_amount <= Decimal::ZERO {
            return Err(CurveError::InvalidParameter(format!(
                "max_trade_amount must be > 0 (got {})",
                self.max_trade_amount
            )));
        }
        for (id, market) in self.markets.iter_mut() {
            if market.dataset_id() != id {
                return Err(CurveError::InvalidParameter(format!(
                    "market stored under '{}' has id '{}'",
                    id,
                    market.dataset_id()
                )));
            }
            if market.engine() != &self.engine {
                warn!(dataset_id = %id, "Market engine differs from book engine");
            }
            market.validate()?;
        }
        Ok(())
    }
}
