//! Trade quotes on a bonding curve
//!
//! A quote is a read-only preview of a trade: what the curve charges or
//! refunds, the fee on top, and how far the spot price moves.
//!
//! # Architecture
//! - `TradeSide`: Buy (mint, supply grows) or Sell (burn, supply shrinks)
//! - `QuoteEngine`: curve + fee schedule, produces quotes
//! - `TradeQuote`: result carrying totals and price movement

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::curve::BondingCurve;
use super::errors::{CurveError, CurveResult};

/// Highest fee accepted by the engine (10%)
pub const MAX_FEE_BPS: u16 = 1_000;

const BPS_DENOMINATOR: Decimal = dec!(10000);
const HUNDRED: Decimal = dec!(100);

/// Direction of a trade against the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// Preview of a trade against the curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct TradeQuote {
    pub side: TradeSide,
    /// Tokens bought or sold
    pub amount: Decimal,
    /// Area under the curve for this trade (before fees)
    pub gross: Decimal,
    /// Fee charged on `gross`
    pub fee: Decimal,
    /// Buyer pays `gross + fee`; seller receives `gross - fee`
    pub total: Decimal,
    /// `gross / amount`, zero for an empty trade
    pub average_price: Decimal,
    pub price_before: Decimal,
    pub price_after: Decimal,
    /// Spot price change in percent, zero when the curve starts at price 0
    pub price_impact_pct: Decimal,
    pub supply_before: Decimal,
    pub supply_after: Decimal,
}

impl TradeQuote {
    /// Round the monetary fields for display
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            gross: self.gross.round_dp(dp),
            fee: self.fee.round_dp(dp),
            total: self.total.round_dp(dp),
            average_price: self.average_price.round_dp(dp),
            price_before: self.price_before.round_dp(dp),
            price_after: self.price_after.round_dp(dp),
            price_impact_pct: self.price_impact_pct.round_dp(dp),
            ..self.clone()
        }
    }
}

/// Prices trades on a curve with a flat fee in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EngineParams")]
pub struct QuoteEngine {
    curve: BondingCurve,
    fee_bps: u16,
}

#[derive(Deserialize)]
struct EngineParams {
    curve: BondingCurve,
    fee_bps: u16,
}

impl TryFrom<EngineParams> for QuoteEngine {
    type Error = CurveError;

    fn try_from(params: EngineParams) -> CurveResult<Self> {
        Self::new(params.curve, params.fee_bps)
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self {
            curve: BondingCurve::default(),
            fee_bps: 0,
        }
    }
}

impl QuoteEngine {
    /// Create an engine. Fees above `MAX_FEE_BPS` are rejected.
    pub fn new(curve: BondingCurve, fee_bps: u16) -> CurveResult<Self> {
        if fee_bps > MAX_FEE_BPS {
            return Err(CurveError::InvalidParameter(format!(
                "fee_bps must be <= {} (got {})",
                MAX_FEE_BPS, fee_bps
            )));
        }
        Ok(Self { curve, fee_bps })
    }

    pub fn curve(&self) -> &BondingCurve {
        &self.curve
    }

    pub fn fee_bps(&self) -> u16 {
        self.fee_bps
    }

    /// Fee charged on a gross curve value
    pub fn fee_on(&self, gross: Decimal) -> CurveResult<Decimal> {
        if self.fee_bps == 0 {
            return Ok(Decimal::ZERO);
        }
        gross
            .checked_mul(Decimal::from(self.fee_bps))
            .and_then(|v| v.checked_div(BPS_DENOMINATOR))
            .ok_or(CurveError::Overflow("fee"))
    }

    /// Quote buying `amount` tokens at `supply`
    pub fn quote_buy(&self, supply: Decimal, amount: Decimal) -> CurveResult<TradeQuote> {
        let gross = self.curve.buy_cost(supply, amount)?;
        let fee = self.fee_on(gross)?;
        let total = gross.checked_add(fee).ok_or(CurveError::Overflow("quote_buy"))?;
        let supply_after = supply
            .max(Decimal::ZERO)
            .checked_add(amount.max(Decimal::ZERO))
            .ok_or(CurveError::Overflow("quote_buy"))?;

        self.build(TradeSide::Buy, supply, supply_after, gross, fee, total)
    }

    /// Quote selling `amount` tokens at `supply`
    ///
    /// # Errors
    /// `InsufficientSupply` when `amount > supply`.
    pub fn quote_sell(&self, supply: Decimal, amount: Decimal) -> CurveResult<TradeQuote> {
        let gross = self.curve.sell_refund(supply, amount)?;
        let fee = self.fee_on(gross)?;
        let total = gross - fee;
        let supply_after = supply.max(Decimal::ZERO) - amount.max(Decimal::ZERO);

        self.build(TradeSide::Sell, supply, supply_after, gross, fee, total)
    }

    fn build(
        &self,
        side: TradeSide,
        supply_before: Decimal,
        supply_after: Decimal,
        gross: Decimal,
        fee: Decimal,
        total: Decimal,
    ) -> CurveResult<TradeQuote> {
        let supply_before = supply_before.max(Decimal::ZERO);
        let amount = (supply_after - supply_before).abs();

        let average_price = if amount.is_zero() {
            Decimal::ZERO
        } else {
            gross
                .checked_div(amount)
                .ok_or(CurveError::Overflow("average_price"))?
        };

        let price_before = self.curve.price_at(supply_before)?;
        let price_after = self.curve.price_at(supply_after)?;
        let price_impact_pct = if price_before.is_zero() {
            Decimal::ZERO
        } else {
            (price_after - price_before)
                .checked_div(price_before)
                .and_then(|r| r.checked_mul(HUNDRED))
                .ok_or(CurveError::Overflow("price_impact"))?
        };

        Ok(TradeQuote {
            side,
            amount,
            gross,
            fee,
            total,
            average_price,
            price_before,
            price_after,
            price_impact_pct,
            supply_before,
            supply_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(fee_bps: u16) -> QuoteEngine {
        QuoteEngine::new(BondingCurve::default(), fee_bps).unwrap()
    }

    #[test]
    fn test_buy_quote_without_fee() {
        let quote = engine(0).quote_buy(dec!(100), dec!(100)).unwrap();

        assert_eq!(quote.side, TradeSide::Buy);
        assert_eq!(quote.amount, dec!(100));
        assert_eq!(quote.fee, Decimal::ZERO);
        assert_eq!(quote.total, quote.gross);
        assert_eq!(quote.supply_before, dec!(100));
        assert_eq!(quote.supply_after, dec!(200));
        // price(100) = 1, price(200) = 4
        assert_eq!(quote.price_before, dec!(1));
        assert_eq!(quote.price_after, dec!(4));
        assert_eq!(quote.price_impact_pct, dec!(300));
    }

    #[test]
    fn test_buy_quote_average_between_spot_prices() {
        let quote = engine(0).quote_buy(dec!(100), dec!(100)).unwrap();
        // 0.0001 / 3 * (200³ − 100³) = 700 / 3, averaged over 100 tokens
        assert_eq!(quote.gross.round_dp(6), dec!(233.333333));
        assert_eq!(quote.average_price.round_dp(6), dec!(2.333333));
        assert!(quote.average_price > quote.price_before);
        assert!(quote.average_price < quote.price_after);
    }

    #[test]
    fn test_buy_fee_added_on_top() {
        // 100 bps = 1%
        let quote = engine(100).quote_buy(dec!(0), dec!(300)).unwrap();
        // gross = 0.0001 / 3 * 300³ = 900
        assert_eq!(quote.gross, dec!(900));
        assert_eq!(quote.fee, dec!(9));
        assert_eq!(quote.total, dec!(909));
    }

    #[test]
    fn test_sell_fee_deducted() {
        let quote = engine(250).quote_sell(dec!(300), dec!(300)).unwrap();
        assert_eq!(quote.side, TradeSide::Sell);
        assert_eq!(quote.gross, dec!(900));
        assert_eq!(quote.fee, dec!(22.5));
        assert_eq!(quote.total, dec!(877.5));
        assert_eq!(quote.supply_after, Decimal::ZERO);
        assert_eq!(quote.price_impact_pct, dec!(-100));
    }

    #[test]
    fn test_sell_quote_insufficient_supply() {
        let result = engine(0).quote_sell(dec!(5), dec!(10));
        assert!(matches!(result, Err(CurveError::InsufficientSupply { .. })));
    }

    #[test]
    fn test_first_buy_has_zero_impact() {
        let quote = engine(0).quote_buy(dec!(0), dec!(10)).unwrap();
        assert_eq!(quote.price_before, Decimal::ZERO);
        assert_eq!(quote.price_impact_pct, Decimal::ZERO);
    }

    #[test]
    fn test_empty_trade_quote() {
        let quote = engine(0).quote_buy(dec!(50), dec!(0)).unwrap();
        assert_eq!(quote.amount, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::ZERO);
        assert_eq!(quote.average_price, Decimal::ZERO);
        assert_eq!(quote.price_before, quote.price_after);
    }

    #[test]
    fn test_fee_above_max_rejected() {
        let result = QuoteEngine::new(BondingCurve::default(), MAX_FEE_BPS + 1);
        assert!(matches!(result, Err(CurveError::InvalidParameter(_))));
        assert!(QuoteEngine::new(BondingCurve::default(), MAX_FEE_BPS).is_ok());
    }

    #[test]
    fn test_stored_engine_is_validated() {
        let err = serde_json::from_str::<QuoteEngine>(r#"{"curve":{"k":"0.0001"},"fee_bps":5000}"#)
            .unwrap_err();
        assert!(err.to_string().contains("fee_bps must be <= 1000"));

        let stored = serde_json::to_string(&engine(75)).unwrap();
        let restored: QuoteEngine = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, engine(75));
    }

    #[test]
    fn test_rounded_quote() {
        let quote = engine(0).quote_buy(dec!(0), dec!(100)).unwrap().rounded(4);
        assert_eq!(quote.gross, dec!(33.3333));
        assert_eq!(quote.amount, dec!(100));
    }

    #[test]
    fn test_quote_serializes_side_lowercase() {
        let quote = engine(0).quote_buy(dec!(0), dec!(1)).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["side"], "buy");
    }
}
