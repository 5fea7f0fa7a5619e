//! Money

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to monetary calculations.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// Percentage calculation could not be safely converted back to minor units.
    #[error("percentage conversion overflowed or was not representable")]
    PercentConversion,
}

/// A non-negative amount of money in minor units (pence/cents/paise).
///
/// Keeping amounts in integer minor units makes every stored value exact to
/// two decimal places; the only place fractional money can arise is
/// percentage math, which goes through [`Money::percent_of`] and rounds
/// half-up there.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating at the representable maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, clamping at zero rather than going negative.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiplies the amount by a unitless quantity, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Takes a fractional percentage of the amount, rounding half-up to the
    /// nearest minor unit.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::PercentConversion`] when the intermediate
    /// decimal multiplication overflows or the result does not fit back into
    /// minor units.
    pub fn percent_of(self, percent: Percentage) -> Result<Self, MoneyError> {
        let fraction = percent * Decimal::ONE;
        let minor = Decimal::from(self.0);

        let applied = fraction
            .checked_mul(minor)
            .ok_or(MoneyError::PercentConversion)?;

        let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        rounded
            .to_u64()
            .map(Self::from_minor)
            .ok_or(MoneyError::PercentConversion)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
