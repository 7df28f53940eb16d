//! Monetary rounding with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` and are stored to two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places amounts are stored with.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Midpoint rounding applied when an amount is reduced to cents.
///
/// A projector uses one mode for every amount it rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half to even (banker's rounding).
    #[default]
    Bankers,
    /// Round half away from zero.
    HalfUp,
}

impl RoundingMode {
    /// Returns the `rust_decimal` strategy for this mode.
    #[must_use]
    pub const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::Bankers => RoundingStrategy::MidpointNearestEven,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bankers => write!(f, "bankers"),
            Self::HalfUp => write!(f, "half_up"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bankers" | "half_even" => Ok(Self::Bankers),
            "half_up" => Ok(Self::HalfUp),
            _ => Err(format!("Unknown rounding mode: {s}")),
        }
    }
}

/// Rounds an amount to cents and fixes its scale at two decimal places.
///
/// `100` becomes `100.00`, so stored and serialized amounts always carry cents.
#[must_use]
pub fn round_money(amount: Decimal, mode: RoundingMode) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, mode.strategy());
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}
