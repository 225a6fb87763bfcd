//! Input sanitization for curve operations
//!
//! Callers hand the pricing layer loosely-typed numbers (JSON bodies, query
//! strings, JS `number`s). `InputPolicy` decides what happens to values that
//! are missing, non-numeric or negative:
//!
//! | Policy   | missing / NaN / ±inf / negative / unparseable |
//! |----------|-----------------------------------------------|
//! | `Coerce` | becomes `0`, logged at `warn`                  |
//! | `Strict` | `CurveError::InvalidInput`                     |
//!
//! Finite values that do not fit in a `Decimal` are an `Overflow` under both
//! policies.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::errors::{CurveError, CurveResult};

/// How invalid numeric inputs are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Replace invalid values with zero
    #[default]
    Coerce,
    /// Reject invalid values
    Strict,
}

impl std::fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputPolicy::Coerce => write!(f, "coerce"),
            InputPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl InputPolicy {
    /// Convert an optional float (e.g. a JSON number that may be absent)
    pub fn from_f64(&self, field: &'static str, raw: Option<f64>) -> CurveResult<Decimal> {
        let value = match raw {
            None => return self.reject(field, "value is missing".to_string()),
            Some(v) if v.is_nan() => return self.reject(field, "value is NaN".to_string()),
            Some(v) if v.is_infinite() => {
                return self.reject(field, format!("value is {}", v))
            }
            Some(v) => v,
        };

        let decimal = Decimal::from_f64(value).ok_or(CurveError::Overflow(field))?;
        self.from_decimal(field, decimal)
    }

    /// Apply the sign rule to an already-decimal value
    pub fn from_decimal(&self, field: &'static str, raw: Decimal) -> CurveResult<Decimal> {
        if raw.is_zero() {
            return Ok(Decimal::ZERO);
        }
        if raw.is_sign_negative() {
            return self.reject(field, format!("value {} is negative", raw));
        }
        Ok(raw)
    }

    /// Parse a textual amount (CLI argument, query string)
    pub fn parse(&self, field: &'static str, raw: &str) -> CurveResult<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.reject(field, "value is missing".to_string());
        }

        match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            Ok(decimal) => self.from_decimal(field, decimal),
            Err(_) => self.reject(field, format!("'{}' is not a number", trimmed)),
        }
    }

    fn reject(&self, field: &'static str, reason: String) -> CurveResult<Decimal> {
        match self {
            InputPolicy::Coerce => {
                warn!(field, reason = %reason, "Coercing invalid input to zero");
                Ok(Decimal::ZERO)
            }
            InputPolicy::Strict => Err(CurveError::InvalidInput { field, reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy_is_coerce() {
        assert_eq!(InputPolicy::default(), InputPolicy::Coerce);
    }

    #[test]
    fn test_valid_values_pass_through() {
        for policy in [InputPolicy::Coerce, InputPolicy::Strict] {
            assert_eq!(policy.from_f64("amount", Some(100.0)).unwrap(), dec!(100));
            assert_eq!(policy.from_f64("amount", Some(0.0)).unwrap(), Decimal::ZERO);
            assert_eq!(policy.from_decimal("amount", dec!(2.5)).unwrap(), dec!(2.5));
            assert_eq!(policy.parse("amount", " 12.75 ").unwrap(), dec!(12.75));
        }
    }

    #[test]
    fn test_coerce_invalid_floats_to_zero() {
        let policy = InputPolicy::Coerce;
        for raw in [None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(-3.0)] {
            assert_eq!(
                policy.from_f64("amount", raw).unwrap(),
                Decimal::ZERO,
                "Failed for input: {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_strict_rejects_invalid_floats() {
        let policy = InputPolicy::Strict;
        for raw in [None, Some(f64::NAN), Some(f64::INFINITY), Some(-3.0)] {
            let result = policy.from_f64("amount", raw);
            assert!(
                matches!(result, Err(CurveError::InvalidInput { field: "amount", .. })),
                "Failed for input: {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_non_numeric() {
        assert_eq!(InputPolicy::Coerce.parse("supply", "abc").unwrap(), Decimal::ZERO);
        assert_eq!(InputPolicy::Coerce.parse("supply", "").unwrap(), Decimal::ZERO);

        let err = InputPolicy::Strict.parse("supply", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input for supply: 'abc' is not a number");
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(InputPolicy::Strict.parse("amount", "1e3").unwrap(), dec!(1000));
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        assert_eq!(InputPolicy::Strict.from_f64("amount", Some(-0.0)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_float_overflows() {
        for policy in [InputPolicy::Coerce, InputPolicy::Strict] {
            assert_eq!(
                policy.from_f64("amount", Some(1e40)),
                Err(CurveError::Overflow("amount"))
            );
        }
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let strict: InputPolicy = serde_yaml::from_str("strict").unwrap();
        assert_eq!(strict, InputPolicy::Strict);
        assert_eq!(InputPolicy::Coerce.to_string(), "coerce");
    }
}
