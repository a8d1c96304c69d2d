//! Type-safe price representation using decimal arithmetic.
//!
//! Product prices arrive as loose JSON (a number such as `179.9` or a string
//! such as `"179.90"`). [`Price::from_json`] turns either form into a
//! `Decimal` so line subtotals never go through floating point.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from interpreting a price field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price must be a number or numeric string, got {0}")]
    NotNumeric(String),
    #[error("price must not be negative: {0}")]
    Negative(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Interpret a raw JSON price field in the default currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the value is not numeric or is negative.
    pub fn from_json(value: &Value) -> Result<Self, PriceError> {
        let raw = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => return Err(PriceError::NotNumeric(other.to_string())),
        };
        let amount = Decimal::from_str(&raw).map_err(|_| PriceError::NotNumeric(raw.clone()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self::new(amount, CurrencyCode::default()))
    }

    /// Price of `quantity` units, `None` on overflow.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// Sum of two prices, `None` when the currencies differ or on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.currency_code != other.currency_code {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// Format for display (e.g., "R$ 179.90").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_from_number() {
        let price = Price::from_json(&json!(179.9)).unwrap();
        assert_eq!(price.amount, Decimal::new(1799, 1));
        assert_eq!(price.currency_code, CurrencyCode::BRL);
    }

    #[test]
    fn test_price_from_string() {
        let price = Price::from_json(&json!(" 139.90 ")).unwrap();
        assert_eq!(price.amount, Decimal::new(13990, 2));
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert!(matches!(
            Price::from_json(&json!("cheap")),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::from_json(&json!(null)),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::from_json(&json!(-1)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_price_times_and_add() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::BRL);
        let total = price.times(3).unwrap();
        assert_eq!(total.amount, Decimal::new(5997, 2));

        let sum = total.checked_add(&price).unwrap();
        assert_eq!(sum.amount, Decimal::new(7996, 2));

        let dollars = Price::new(Decimal::ONE, CurrencyCode::USD);
        assert!(price.checked_add(&dollars).is_none());
    }

    #[test]
    fn test_price_overflow_is_none() {
        let huge = Price::from_json(&json!("70000000000000000000000000000")).unwrap();
        assert!(huge.times(2).is_none());
        assert!(huge.checked_add(&huge).is_none());
        assert_eq!(huge.times(1).unwrap().amount, huge.amount);
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(1799, 1), CurrencyCode::BRL);
        assert_eq!(price.display(), "R$ 179.90");
    }
}
