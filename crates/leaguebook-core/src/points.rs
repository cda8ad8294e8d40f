// Fixed-point fantasy points.
//
// Sleeper reports season totals as an integer plus a separate hundredths
// field, and weekly scores as JSON floats. Both are normalized to a decimal
// with two places so long multi-season sums never drift.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A points value with two decimal digits of precision.
///
/// Serializes as its two-place string (`"1002.00"`) so exports never pass
/// through a float. Deserializes from a JSON number or string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(Decimal);

impl Points {
    pub const ZERO: Points = Points(Decimal::ZERO);

    /// Combine an integer part with a hundredths part (`fpts` + `fpts_decimal`).
    pub fn from_parts(whole: i64, hundredths: i64) -> Self {
        Points(Decimal::new(whole * 100 + hundredths, 2))
    }

    /// Convert a wire float, rounding to two places. Non-finite input is zero.
    pub fn from_f64(value: f64) -> Self {
        Decimal::from_f64(value)
            .map(|d| Points(d.round_dp(2)))
            .unwrap_or(Points::ZERO)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for presentation-only math (percentages, charts).
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a Points> for Points {
    fn sum<I: Iterator<Item = &'a Points>>(iter: I) -> Points {
        iter.copied().sum()
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(|d| Points(d.round_dp(2)))
    }
}
