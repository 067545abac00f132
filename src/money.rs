//! Fixed-point currency amounts in minor units (paise)

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Number of minor units in one major unit (100 paise = 1 rupee)
const MINOR_PER_MAJOR: i64 = 100;

/// A signed amount of money stored as integer paise.
///
/// All ledger arithmetic happens on this type so that balance checks are exact.
/// Decimal text is only produced or parsed at the edges through [`BigDecimal`].
///
/// The operators saturate at the `i64` bounds. Totals that must report an
/// overflow use [`Money::checked_add`] and [`Money::checked_sum`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);
    pub const MIN: Money = Money(i64::MIN);

    /// Create an amount from minor units (paise)
    pub const fn from_minor(paise: i64) -> Self {
        Self(paise)
    }

    /// Create an amount from whole major units (rupees)
    pub const fn from_major(rupees: i64) -> Self {
        Self(rupees.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Amount in minor units
    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Sum that reports overflow instead of saturating
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add)
    }

    /// The amount if positive, otherwise zero
    pub fn positive_part(self) -> Self {
        Self(self.0.max(0))
    }

    /// Convert to a decimal in major units with two fractional digits
    pub fn to_decimal(self) -> BigDecimal {
        (BigDecimal::from(self.0) / BigDecimal::from(MINOR_PER_MAJOR)).with_scale(2)
    }

    /// Convert a decimal in major units, rounding half-up to the nearest paisa.
    ///
    /// Returns `None` when the value does not fit in the minor-unit range.
    pub fn from_decimal(value: &BigDecimal) -> Option<Self> {
        (value * BigDecimal::from(MINOR_PER_MAJOR))
            .with_scale_round(0, RoundingMode::HalfUp)
            .to_i64()
            .map(Self)
    }

    /// `self × rate / 100`, rounded half-up to paise
    pub fn percent(self, rate: &BigDecimal) -> Option<Self> {
        let major = self.to_decimal() * rate / BigDecimal::from(100);
        Self::from_decimal(&major)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let minor = abs % MINOR_PER_MAJOR as u64;
        f.pad(&format!("{sign}{major}.{minor:02}"))
    }
}

/// Errors when reading money from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    Parse(String),
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            BigDecimal::from_str(s.trim()).map_err(|_| MoneyError::Parse(s.to_string()))?;
        Self::from_decimal(&value).ok_or_else(|| MoneyError::OutOfRange(s.to_string()))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
