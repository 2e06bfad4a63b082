//! Unit prices.
//!
//! Prices are decimal dollar amounts held as `f64`, matching the catalog
//! fixtures. Aggregation (cart totals) is done in `f64` as well; conversion to
//! integer minor units happens only at the payment boundary.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of minor units (cents) in one major unit (dollar).
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Non-negative, finite unit price in major currency units.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    /// Validate and wrap a decimal amount.
    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        Ok(Self(amount))
    }

    /// Exact construction from whole cents; always valid.
    pub fn from_minor_units(cents: u32) -> Self {
        Self(f64::from(cents) / MINOR_UNITS_PER_MAJOR)
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    /// `round(amount * 100)`, the integer amount payment providers expect.
    ///
    /// `None` when the amount does not fit in an `i64` of cents.
    pub fn minor_units(&self) -> Option<i64> {
        let cents = (self.0 * MINOR_UNITS_PER_MAJOR).round();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        if cents >= i64::MAX as f64 {
            return None;
        }
        Some(cents as i64)
    }

    /// Contribution of `quantity` units at this price.
    pub fn extended(&self, quantity: u32) -> f64 {
        self.0 * f64::from(quantity)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl ValueObject for Price {}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
