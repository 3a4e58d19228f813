//! Type-safe price representation using decimal arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when converting a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount does not fit the payment gateway's integer subunit field.
    #[error("price out of range for subunit conversion: {0}")]
    OutOfRange(Decimal),
}

/// A price with currency information.
///
/// Amounts are stored in the currency's standard unit (e.g., rupees, not
/// paise) as a `Decimal` to avoid floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
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

    /// Convert to the smallest currency unit (paise, cents).
    ///
    /// Payment gateways take integer amounts in subunits; fractional
    /// subunits are rounded half-up.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for negative amounts and
    /// `PriceError::OutOfRange` if the result does not fit in `i64`.
    pub fn subunits(&self) -> Result<i64, PriceError> {
        if self.amount.is_sign_negative() {
            return Err(PriceError::Negative(self.amount));
        }

        // Decimal::round() is half-to-even; the gateway contract is half-up.
        let scaled = self
            .amount
            .checked_mul(Decimal::from(100))
            .ok_or(PriceError::OutOfRange(self.amount))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        scaled.to_i64().ok_or(PriceError::OutOfRange(self.amount))
    }

    /// Format for display (e.g., "₹499.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Parse from an ISO 4217 code.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "INR" => Some(Self::INR),
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subunits_whole_amount() {
        let price = Price::new(Decimal::new(499, 0), CurrencyCode::INR);
        assert_eq!(price.subunits().unwrap(), 49_900);
    }

    #[test]
    fn test_subunits_fractional_amount() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.subunits().unwrap(), 1999);
    }

    #[test]
    fn test_subunits_rounds_sub_cent() {
        // 10.005 rounds to 1001 subunits (half-up)
        let price = Price::new(Decimal::new(10_005, 3), CurrencyCode::INR);
        assert_eq!(price.subunits().unwrap(), 1001);
    }

    #[test]
    fn test_subunits_overflow_is_an_error_not_a_panic() {
        let price = Price::new(Decimal::MAX, CurrencyCode::INR);
        assert!(matches!(price.subunits(), Err(PriceError::OutOfRange(_))));
    }

    #[test]
    fn test_subunits_rejects_negative() {
        let price = Price::new(Decimal::new(-100, 0), CurrencyCode::INR);
        assert!(matches!(price.subunits(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(49_900, 2), CurrencyCode::INR);
        assert_eq!(price.display(), "₹499.00");
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::INR.code(), "INR");
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
        assert_eq!(CurrencyCode::parse("USD"), Some(CurrencyCode::USD));
        assert_eq!(CurrencyCode::parse("JPY"), None);
    }
}
