use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A non-negative amount in the smallest currency unit.
///
/// Arithmetic saturates instead of wrapping so that a pathological cart can
/// never produce a total smaller than one of its lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Money> for u64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arithmetic() {
        assert_eq!(Money(10) + Money(5), Money(15));
        assert_eq!(Money(1_200).times(3), Money(3_600));

        let mut m = Money(7);
        m += Money(3);
        assert_eq!(m, Money(10));
    }

    #[test]
    fn test_money_saturates() {
        assert_eq!(Money(u64::MAX) + Money(1), Money(u64::MAX));
        assert_eq!(Money(u64::MAX).times(2), Money(u64::MAX));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [Money(1), Money(2), Money(3)].into_iter().sum();
        assert_eq!(total, Money(6));
        let empty: Money = std::iter::empty().sum();
        assert_eq!(empty, Money::ZERO);
    }

    #[test]
    fn test_money_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Money(8_910_000)).unwrap(), "8910000");
        let m: Money = serde_json::from_str("42").unwrap();
        assert_eq!(m, Money(42));
    }
}
