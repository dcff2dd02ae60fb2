use std::{
    fmt::{Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign},
};

use alloy::primitives::{
    utils::{format_ether, parse_ether},
    U256,
};
use serde::{Serialize, Serializer};

/// Native currency amount in its smallest unit.
///
/// Kept as an integer so totals are exact sums of the per-address values. The
/// decimal ether form is only produced at the display/serialization edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(U256);

impl Wei {
    pub const ZERO: Wei = Wei(U256::ZERO);

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    /// Parses a decimal ether string such as `"1.5"`.
    pub fn from_ether(ether: &str) -> Option<Self> {
        parse_ether(ether).ok().map(Self)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Full precision decimal ether string, 18 fractional digits.
    pub fn to_ether_string(&self) -> String {
        format_ether(self.0)
    }

    /// Lossy float conversion for human-facing summaries.
    pub fn to_ether_f64(&self) -> f64 {
        self.to_ether_string().parse().unwrap_or_default()
    }

    /// Mean over `count` entries, truncated to a whole wei. `None` when `count`
    /// is zero.
    pub fn checked_mean(&self, count: usize) -> Option<Wei> {
        if count == 0 {
            return None;
        }
        Some(Wei(self.0 / U256::from(count)))
    }
}

impl From<U256> for Wei {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl Add for Wei {
    type Output = Wei;

    fn add(self, rhs: Wei) -> Wei {
        Wei(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Wei {
    fn add_assign(&mut self, rhs: Wei) {
        *self = *self + rhs;
    }
}

impl Sum for Wei {
    fn sum<I: Iterator<Item = Wei>>(iter: I) -> Wei {
        iter.fold(Wei::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Wei> for Wei {
    fn sum<I: Iterator<Item = &'a Wei>>(iter: I) -> Wei {
        iter.copied().sum()
    }
}

impl Display for Wei {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_ether_string())
    }
}

impl Serialize for Wei {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
