//! Native-unit amounts.
//!
//! Amounts are integral wei (`1 ether = 10^18 wei`). USD values produced by
//! the price converter use the same 18-decimal fixed point, so both are
//! carried as [`Wei`]-scaled integers and converted to [`Decimal`] only for
//! display and error reporting.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::NATIVE_DECIMALS;

/// Wei per ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// An amount of the native value unit, in wei.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Self = Self(0);

    /// Whole ether, e.g. `Wei::from_ether(1)` for one ether.
    #[must_use]
    pub fn from_ether(ether: u64) -> Self {
        Self(u128::from(ether) * WEI_PER_ETHER)
    }

    /// Parse a decimal ether amount (`"0.025"`) into wei.
    ///
    /// Returns `None` if the value is negative, has more than 18 decimal
    /// places, or does not fit.
    #[must_use]
    pub fn parse_ether(s: &str) -> Option<Self> {
        let value: Decimal = s.trim().parse().ok()?;
        if value.is_sign_negative() || value.scale() > NATIVE_DECIMALS {
            return None;
        }
        let mantissa = u128::try_from(value.mantissa()).ok()?;
        let scale_up = 10u128.checked_pow(NATIVE_DECIMALS - value.scale())?;
        mantissa.checked_mul(scale_up).map(Self)
    }

    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Checked sum of many amounts; `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    /// Value as a decimal with 18 fractional digits.
    ///
    /// `None` when the amount exceeds the 96-bit decimal mantissa.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        let mantissa = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(mantissa, NATIVE_DECIMALS)
            .ok()
            .map(|d| d.normalize())
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
