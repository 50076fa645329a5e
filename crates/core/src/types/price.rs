//! Type-safe price representation using decimal arithmetic.
//!
//! Pack prices and invoice totals are in West African CFA francs (XOF),
//! which has no minor unit: amounts sent to the payment provider must be
//! whole, positive numbers.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when converting a [`Price`] for the payment provider.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("amount must be positive")]
    NotPositive,
    #[error("amount must be a whole number of {0}")]
    Fractional(CurrencyCode),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A price in CFA francs.
    #[must_use]
    pub fn xof(amount: u64) -> Self {
        Self::new(Decimal::from(amount), CurrencyCode::XOF)
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.amount.is_zero()
    }

    /// The amount as a positive whole number, as required for an invoice total.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` for zero or negative amounts and
    /// `PriceError::Fractional` when the amount has a fractional part.
    pub fn whole_units(&self) -> Result<u64, PriceError> {
        if self.amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if !self.amount.fract().is_zero() {
            return Err(PriceError::Fractional(self.currency_code));
        }
        self.amount
            .to_u64()
            .ok_or(PriceError::Fractional(self.currency_code))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.amount.normalize(),
            self.currency_code.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// West African CFA franc.
    #[default]
    XOF,
    EUR,
    USD,
}

impl CurrencyCode {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::XOF => "XOF",
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::XOF => "FCFA",
            Self::EUR => "€",
            Self::USD => "$",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
