//! Per-dataset market ledger
//!
//! Each tokenized dataset has one `DatasetMarket` that tracks issued supply,
//! the collateral reserve and fee income, and applies trades through its
//! `QuoteEngine`. The reserve is kept at the area under the curve at the
//! current supply. Fees are held outside it. Per-trade payments can differ
//! from that area in the last digits `Decimal` keeps, so after every trade
//! the reserve is re-derived from supply instead of summed.
//!
//! A trade that fails any check leaves the market untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::errors::{CurveError, CurveResult};
use super::quote::{QuoteEngine, TradeQuote, TradeSide};

/// Record of an executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// Unique identifier (UUID v4)
    pub id: Uuid,
    pub dataset_id: String,
    pub side: TradeSide,
    pub amount: Decimal,
    pub gross: Decimal,
    pub fee: Decimal,
    /// Paid by the buyer or received by the seller
    pub total: Decimal,
    pub supply_before: Decimal,
    pub supply_after: Decimal,
    pub price_after: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// Price and market-cap report for one dataset token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub dataset_id: String,
    pub name: String,
    pub supply: Decimal,
    pub price: Decimal,
    pub market_cap: Decimal,
    pub reserve: Decimal,
    pub fees_collected: Decimal,
    pub trade_count: u64,
    pub updated_at: DateTime<Utc>,
}

/// Bonding-curve market for a single dataset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMarket {
    dataset_id: String,
    name: String,
    engine: QuoteEngine,
    max_trade_amount: Decimal,
    supply: Decimal,
    reserve: Decimal,
    fees_collected: Decimal,
    trade_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DatasetMarket {
    /// Open an empty market (supply 0, reserve 0)
    pub fn new(
        dataset_id: impl Into<String>,
        name: impl Into<String>,
        engine: QuoteEngine,
        max_trade_amount: Decimal,
    ) -> CurveResult<Self> {
        let dataset_id = dataset_id.into();
        if dataset_id.trim().is_empty() {
            return Err(CurveError::InvalidParameter(
                "dataset id cannot be empty".to_string(),
            ));
        }
        check_max_trade(max_trade_amount)?;

        let now = Utc::now();
        Ok(Self {
            dataset_id,
            name: name.into(),
            engine,
            max_trade_amount,
            supply: Decimal::ZERO,
            reserve: Decimal::ZERO,
            fees_collected: Decimal::ZERO,
            trade_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    pub fn supply(&self) -> Decimal {
        self.supply
    }

    pub fn reserve(&self) -> Decimal {
        self.reserve
    }

    pub fn fees_collected(&self) -> Decimal {
        self.fees_collected
    }

    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Preview a buy at the current supply
    pub fn quote_buy(&self, amount: Decimal) -> CurveResult<TradeQuote> {
        self.engine.quote_buy(self.supply, amount)
    }

    /// Preview a sell at the current supply
    pub fn quote_sell(&self, amount: Decimal) -> CurveResult<TradeQuote> {
        self.engine.quote_sell(self.supply, amount)
    }

    /// Mint `amount` tokens
    ///
    /// `max_total` caps what the buyer is willing to pay including fees.
    pub fn buy(&mut self, amount: Decimal, max_total: Option<Decimal>) -> CurveResult<TradeReceipt> {
        self.check_amount(amount)?;
        let quote = self.quote_buy(amount)?;

        if let Some(limit) = max_total {
            if quote.total > limit {
                return Err(CurveError::SlippageExceeded {
                    quoted: quote.total,
                    limit,
                });
            }
        }

        let reserve = self.engine.curve().area_under(quote.supply_after)?;
        let fees = self
            .fees_collected
            .checked_add(quote.fee)
            .ok_or(CurveError::Overflow("fees_collected"))?;

        self.reserve = reserve;
        self.fees_collected = fees;
        Ok(self.commit(quote))
    }

    /// Burn `amount` tokens
    ///
    /// `min_total` is the smallest payout (after fees) the seller accepts.
    pub fn sell(&mut self, amount: Decimal, min_total: Option<Decimal>) -> CurveResult<TradeReceipt> {
        self.check_amount(amount)?;
        let quote = self.quote_sell(amount)?;

        if quote.gross > self.reserve {
            return Err(CurveError::InsufficientReserve {
                reserve: self.reserve,
                refund: quote.gross,
            });
        }
        if let Some(limit) = min_total {
            if quote.total < limit {
                return Err(CurveError::SlippageExceeded {
                    quoted: quote.total,
                    limit,
                });
            }
        }

        let reserve = self.engine.curve().area_under(quote.supply_after)?;
        let fees = self
            .fees_collected
            .checked_add(quote.fee)
            .ok_or(CurveError::Overflow("fees_collected"))?;

        self.reserve = reserve;
        self.fees_collected = fees;
        Ok(self.commit(quote))
    }

    /// Current price / market-cap report
    pub fn snapshot(&self) -> CurveResult<MarketSnapshot> {
        let curve = self.engine.curve();
        Ok(MarketSnapshot {
            dataset_id: self.dataset_id.clone(),
            name: self.name.clone(),
            supply: self.supply,
            price: curve.price_at(self.supply)?,
            market_cap: curve.market_cap(self.supply)?,
            reserve: self.reserve,
            fees_collected: self.fees_collected,
            trade_count: self.trade_count,
            updated_at: self.updated_at,
        })
    }

    /// Switch to a new engine and trade limit
    ///
    /// The fee and limit may always change. The curve may only change while
    /// the market has no supply, since the reserve is priced on it.
    pub fn reconfigure(&mut self, engine: QuoteEngine, max_trade_amount: Decimal) -> CurveResult<()> {
        check_max_trade(max_trade_amount)?;
        if engine.curve() != self.engine.curve() && !self.supply.is_zero() {
            return Err(CurveError::InvalidParameter(format!(
                "market '{}' has supply {}; curve k cannot change from {} to {}",
                self.dataset_id,
                self.supply,
                self.engine.curve().k(),
                engine.curve().k()
            )));
        }

        self.reserve = engine.curve().area_under(self.supply)?;
        self.engine = engine;
        self.max_trade_amount = max_trade_amount;
        Ok(())
    }

    /// Check a market read from storage and re-derive its reserve
    pub fn validate(&mut self) -> CurveResult<()> {
        if self.dataset_id.trim().is_empty() {
            return Err(CurveError::InvalidParameter(
                "dataset id cannot be empty".to_string(),
            ));
        }
        check_max_trade(self.max_trade_amount)?;
        if self.supply < Decimal::ZERO || self.fees_collected < Decimal::ZERO {
            return Err(CurveError::InvalidParameter(format!(
                "market '{}' has negative supply {} or fees {}",
                self.dataset_id, self.supply, self.fees_collected
            )));
        }

        let reserve = self.engine.curve().area_under(self.supply)?;
        if reserve != self.reserve {
            warn!(
                dataset_id = %self.dataset_id,
                stored = %self.reserve,
                derived = %reserve,
                "Stored reserve differs from curve, using derived value"
            );
            self.reserve = reserve;
        }
        Ok(())
    }

    fn check_amount(&self, amount: Decimal) -> CurveResult<()> {
        if amount <= Decimal::ZERO {
            return Err(CurveError::ZeroAmount);
        }
        if amount > self.max_trade_amount {
            return Err(CurveError::TradeTooLarge {
                amount,
                max: self.max_trade_amount,
            });
        }
        Ok(())
    }

    fn commit(&mut self, quote: TradeQuote) -> TradeReceipt {
        let now = Utc::now();
        self.supply = quote.supply_after;
        self.trade_count += 1;
        self.updated_at = now;

        debug!(
            dataset_id = %self.dataset_id,
            side = %quote.side,
            amount = %quote.amount,
            total = %quote.total,
            supply = %self.supply,
            reserve = %self.reserve,
            "Trade applied"
        );

        TradeReceipt {
            id: Uuid::new_v4(),
            dataset_id: self.dataset_id.clone(),
            side: quote.side,
            amount: quote.amount,
            gross: quote.gross,
            fee: quote.fee,
            total: quote.total,
            supply_before: quote.supply_before,
            supply_after: quote.supply_after,
            price_after: quote.price_after,
            executed_at: now,
        }
    }
}

fn check_max_trade(max_trade_amount: Decimal) -> CurveResult<()> {
    if max_trade_amount <= Decimal::ZERO {
        return Err(CurveError::InvalidParameter(format!(
            "max_trade_amount must be > 0 (got {})",
            max_trade_amount
        )));
    }
    Ok(())
}
