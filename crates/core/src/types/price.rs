//! Decimal money amounts.
//!
//! The commerce backend quotes every price in the store currency, so a
//! [`Money`] value is a bare decimal amount with no currency attached.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in the store currency.
///
/// Serializes as a decimal string (`"19.99"`) and accepts either a string or
/// a JSON number when deserializing, since the backend emits both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from minor units (cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity, saturating at the decimal bounds.
    ///
    /// Used for cart display totals. Anything that persists an amount goes
    /// through [`Money::checked_times`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Multiply by a line quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Add two amounts, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl core::str::FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Self)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Money {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_places() {
        assert_eq!(Money::from_minor(1999).to_string(), "19.99");
        assert_eq!(Money::from(100).to_string(), "100.00");
    }

    #[test]
    fn test_times_quantity() {
        assert_eq!(Money::from(100).times(3), Money::from(300));
    }

    #[test]
    fn test_times_saturates_at_max() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max + Money::from(1), max);
    }

    #[test]
    fn test_checked_overflow_is_none() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max.checked_add(Money::from(1)), None);
        assert_eq!(Money::from(7).checked_times(3), Some(Money::from(21)));
        assert_eq!(
            Money::from(7).checked_add(Money::from_minor(50)),
            Some(Money::from_minor(750))
        );
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from(1), Money::from_minor(250)].into_iter().sum();
        assert_eq!(total, Money::from_minor(350));
    }

    #[test]
    fn test_deserializes_number_and_string() {
        let a: Money = serde_json::from_str("12.5").unwrap();
        let b: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 19.99 ".parse::<Money>().unwrap(), Money::from_minor(1999));
        assert!("nineteen".parse::<Money>().is_err());
    }
}
