// ============================================================================
// Rounding Mode
// Decimal rounding modes, applied to digits rather than binary fractions
// ============================================================================

use rust_decimal::RoundingStrategy;
use std::fmt;
use std::str::FromStr;

use super::errors::CalcError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the digit after the cutoff is resolved when rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RoundingMode {
    /// Midpoint goes away from zero: 2.5 -> 3, -2.5 -> -3
    #[default]
    HalfUp,
    /// Midpoint goes to the even neighbour: 2.5 -> 2, 3.5 -> 4
    HalfEven,
    /// Truncate toward zero
    Down,
    /// Any discarded non-zero digit moves away from zero
    Up,
}

impl RoundingMode {
    /// The equivalent strategy on `rust_decimal`'s base-10 mantissa.
    pub(crate) fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Down => "DOWN",
            RoundingMode::Up => "UP",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HALF_UP" => Ok(RoundingMode::HalfUp),
            "HALF_EVEN" => Ok(RoundingMode::HalfEven),
            "DOWN" => Ok(RoundingMode::Down),
            "UP" => Ok(RoundingMode::Up),
            _ => Err(CalcError::InvalidArguments {
                calculation: "RoundingMode".to_string(),
                expected: "HALF_UP, HALF_EVEN, DOWN or UP".to_string(),
                got: s.to_string(),
            }),
        }
    }
}
