//! Quadratic bonding curve pricing
//!
//! Price of the next token at supply `s` is `price(s) = k * s²`. The cost of
//! moving supply between two points is the area under that curve, which has
//! the closed form `∫k·s² ds = k·s³/3`:
//!
//! ```text
//! buy_cost(s, a)    = k/3 * ((s + a)³ − s³)
//! sell_refund(s, a) = k/3 * (s³ − (s − a)³)      fails when a > s
//! ```
//!
//! The integral is path independent, so buying `a` and then selling `a` from
//! the new supply refunds exactly what was paid.
//!
//! All arithmetic uses `Decimal`. The product with `k` is taken before the
//! division by 3 so that whole-number inputs on the default curve produce the
//! exact repeating decimal (e.g. `buy_cost(0, 100) = 33.333…`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::errors::{CurveError, CurveResult};
use super::input::InputPolicy;

/// Curve constant used by the marketplace contracts
pub const DEFAULT_CURVE_K: Decimal = dec!(0.0001);

const THREE: Decimal = dec!(3);

/// Quadratic bonding curve `price(s) = k * s²`
///
/// Deserialization goes through `BondingCurve::new`, so a stored curve with
/// `k <= 0` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CurveParams")]
pub struct BondingCurve {
    k: Decimal,
}

#[derive(Deserialize)]
struct CurveParams {
    k: Decimal,
}

impl TryFrom<CurveParams> for BondingCurve {
    type Error = CurveError;

    fn try_from(params: CurveParams) -> CurveResult<Self> {
        Self::new(params.k)
    }
}

impl Default for BondingCurve {
    fn default() -> Self {
        Self { k: DEFAULT_CURVE_K }
    }
}

impl BondingCurve {
    /// Create a curve with the given steepness. `k` must be positive.
    pub fn new(k: Decimal) -> CurveResult<Self> {
        if k <= Decimal::ZERO {
            return Err(CurveError::InvalidParameter(format!(
                "curve constant k must be > 0 (got {})",
                k
            )));
        }
        Ok(Self { k })
    }

    /// Curve constant
    #[inline]
    pub fn k(&self) -> Decimal {
        self.k
    }

    /// Spot price of the next token at `supply`: `k * s²`
    pub fn price_at(&self, supply: Decimal) -> CurveResult<Decimal> {
        let s = floor_zero(supply);
        let squared = s.checked_mul(s).ok_or(CurveError::Overflow("price_at"))?;
        self.k
            .checked_mul(squared)
            .ok_or(CurveError::Overflow("price_at"))
    }

    /// Area under the curve from 0 to `supply`: `k * s³ / 3`
    ///
    /// For a market that started empty this is the reserve it must hold.
    pub fn area_under(&self, supply: Decimal) -> CurveResult<Decimal> {
        let cubed = cube(floor_zero(supply), "area_under")?;
        self.scaled_third(cubed, "area_under")
    }

    /// Spot price times supply
    pub fn market_cap(&self, supply: Decimal) -> CurveResult<Decimal> {
        let s = floor_zero(supply);
        self.price_at(s)?
            .checked_mul(s)
            .ok_or(CurveError::Overflow("market_cap"))
    }

    /// Cost to move supply from `current_supply` to `current_supply + amount`
    ///
    /// Negative inputs are treated as 0, so the result is never negative.
    pub fn buy_cost(&self, current_supply: Decimal, amount: Decimal) -> CurveResult<Decimal> {
        let s = floor_zero(current_supply);
        let a = floor_zero(amount);
        if a.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let end = s.checked_add(a).ok_or(CurveError::Overflow("buy_cost"))?;
        let delta = cube(end, "buy_cost")?
            .checked_sub(cube(s, "buy_cost")?)
            .ok_or(CurveError::Overflow("buy_cost"))?;

        self.scaled_third(delta, "buy_cost")
    }

    /// Refund for moving supply from `current_supply` to `current_supply - amount`
    ///
    /// # Errors
    /// `InsufficientSupply` when `amount > current_supply`.
    pub fn sell_refund(&self, current_supply: Decimal, amount: Decimal) -> CurveResult<Decimal> {
        let s = floor_zero(current_supply);
        let a = floor_zero(amount);

        if a > s {
            return Err(CurveError::InsufficientSupply {
                supply: s,
                requested: a,
            });
        }
        if a.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let end = s - a;

        let delta = cube(s, "sell_refund")?
            .checked_sub(cube(end, "sell_refund")?)
            .ok_or(CurveError::Overflow("sell_refund"))?;

        self.scaled_third(delta, "sell_refund")
    }

    #[inline]
    fn scaled_third(&self, value: Decimal, op: &'static str) -> CurveResult<Decimal> {
        self.k
            .checked_mul(value)
            .and_then(|v| v.checked_div(THREE))
            .ok_or(CurveError::Overflow(op))
    }
}

#[inline]
fn floor_zero(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

#[inline]
fn cube(value: Decimal, op: &'static str) -> CurveResult<Decimal> {
    value
        .checked_mul(value)
        .and_then(|sq| sq.checked_mul(value))
        .ok_or(CurveError::Overflow(op))
}

/// Cost to buy `amount` tokens at `current_supply` on the default curve
///
/// Takes plain numbers the way the marketplace frontend and services call
/// it: missing, NaN or negative values count as 0.
pub fn buy_cost(current_supply: f64, amount: f64) -> CurveResult<Decimal> {
    let policy = InputPolicy::Coerce;
    let s = policy.from_f64("current_supply", Some(current_supply))?;
    let a = policy.from_f64("amount", Some(amount))?;
    BondingCurve::default().buy_cost(s, a)
}

/// Refund for selling `amount` tokens at `current_supply` on the default curve
///
/// # Errors
/// `InsufficientSupply` when `amount > current_supply`.
pub fn sell_refund(current_supply: f64, amount: f64) -> CurveResult<Decimal> {
    let policy = InputPolicy::Coerce;
    let s = policy.from_f64("current_supply", Some(current_supply))?;
    let a = policy.from_f64("amount", Some(amount))?;
    BondingCurve::default().sell_refund(s, a)
}
