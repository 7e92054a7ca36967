//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the restaurant's single display currency.
///
/// Wraps a [`Decimal`] so money math never goes through floating point.
/// The restaurant backend sends prices as plain JSON numbers, so the
/// wrapper serializes as a float on the wire.
///
/// ## Examples
///
/// ```
/// use beyond_flavours_core::Price;
/// use rust_decimal::Decimal;
///
/// let unit = Price::new(Decimal::new(550, 2)); // 5.50
/// assert_eq!(unit.line_total(2).to_string(), "$11.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::new(s.parse::<Decimal>().unwrap())
    }

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(price("10").to_string(), "$10.00");
        assert_eq!(price("5.5").to_string(), "$5.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_line_total() {
        assert_eq!(price("5.50").line_total(2), price("11.00"));
        assert_eq!(price("10.00").line_total(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [price("10.00"), price("5.50"), price("5.50")]
            .into_iter()
            .sum();
        assert_eq!(total, price("21.00"));
    }

    #[test]
    fn test_serde_as_json_number() {
        let p: Price = serde_json::from_str("5.5").unwrap();
        assert_eq!(p, price("5.5"));
        assert_eq!(serde_json::to_string(&price("5.5")).unwrap(), "5.5");
    }
}
