//! Monetary amounts in Ugandan shillings.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in Ugandan shillings (UGX).
///
/// The platform trades in a single currency, so no currency code is
/// carried. Decimal arithmetic avoids the float rounding problems that
/// plague order totals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero shillings.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of shillings.
    #[must_use]
    pub fn from_shillings(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UGX {}", self.0)
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_shillings(15_000);
        let b = Money::from_shillings(5_000);
        assert_eq!(a + b, Money::from_shillings(20_000));
        assert_eq!(a - b, Money::from_shillings(10_000));
        assert_eq!(b * 3, Money::from_shillings(15_000));
    }

    #[test]
    fn test_sum() {
        let total: Money = [1_000, 2_000, 3_000]
            .into_iter()
            .map(Money::from_shillings)
            .sum();
        assert_eq!(total, Money::from_shillings(6_000));
    }

    #[test]
    fn test_ordering() {
        assert!(Money::from_shillings(500) < Money::from_shillings(1_000));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_shillings(2_500)), "UGX 2500");
    }
}
