//! Fixed-point decimal used for every rate, ratio and fraction in the oracle.
//!
//! A `Dec` is a signed 128-bit integer scaled by 10^18. Products and quotients
//! are widened to 256 bits and truncated toward zero, so every replica
//! arrives at the same bits without touching floating point.

use crate::error::TypesError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const PRECISION: usize = 18;

const ONE_RAW: i128 = 1_000_000_000_000_000_000;

/// Fixed-point decimal with 18 fractional digits.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(i128);

impl Dec {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);
    pub const MAX: Self = Self(i128::MAX);

    /// Build from the scaled integer representation.
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i128 {
        self.0
    }

    pub fn from_int(value: i64) -> Self {
        Self(value as i128 * ONE_RAW)
    }

    /// Whole-unit integer, `None` if it does not fit.
    pub fn from_u128(value: u128) -> Option<Self> {
        i128::try_from(value)
            .ok()
            .and_then(|v| v.checked_mul(ONE_RAW))
            .map(Self)
    }

    /// `numerator / denominator` truncated toward zero.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let scaled = U256::from(numerator.unsigned_abs()) * U256::from(ONE_RAW as u128);
        let magnitude = scaled / U256::from(denominator.unsigned_abs());
        Self::from_magnitude(magnitude, (numerator < 0) != (denominator < 0))
    }

    /// `mantissa × 10^-decimals`, e.g. `with_prec(5, 2) == 0.05`.
    pub fn with_prec(mantissa: i64, decimals: u32) -> Self {
        debug_assert!(decimals as usize <= PRECISION);
        Self(mantissa as i128 * 10i128.pow(PRECISION as u32 - decimals))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Option<Self> {
        self.0.checked_abs().map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `self × other`, truncated toward zero.
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        let product = U256::from(self.0.unsigned_abs()) * U256::from(other.0.unsigned_abs());
        let magnitude = product / U256::from(ONE_RAW as u128);
        Self::from_magnitude(magnitude, self.is_negative() != other.is_negative())
    }

    /// `self ÷ other`, truncated toward zero. `None` on division by zero.
    pub fn checked_quo(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let scaled = U256::from(self.0.unsigned_abs()) * U256::from(ONE_RAW as u128);
        let magnitude = scaled / U256::from(other.0.unsigned_abs());
        Self::from_magnitude(magnitude, self.is_negative() != other.is_negative())
    }

    pub fn checked_mul_int(self, factor: i128) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Integer division, truncated toward zero.
    pub fn checked_quo_int(self, divisor: i128) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        self.0.checked_div(divisor).map(Self)
    }

    /// Square root, truncated. `None` for negative values.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let scaled = U256::from(self.0.unsigned_abs()) * U256::from(ONE_RAW as u128);
        Self::from_magnitude(scaled.integer_sqrt(), false)
    }

    /// Integer part as an unsigned amount; negative values yield zero.
    pub fn truncate_to_u128(&self) -> u128 {
        if self.0 <= 0 {
            0
        } else {
            (self.0 / ONE_RAW) as u128
        }
    }

    fn from_magnitude(magnitude: U256, negative: bool) -> Option<Self> {
        if magnitude > U256::from(i128::MAX as u128) {
            return None;
        }
        let value = magnitude.as_u128() as i128;
        Some(Self(if negative { -value } else { value }))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let one = ONE_RAW as u128;
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:0width$}",
            magnitude / one,
            magnitude % one,
            width = PRECISION
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({self})")
    }
}

impl FromStr for Dec {
    type Err = TypesError;

    /// Accepts `12`, `12.5`, `.5` and an optional leading `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if body.ends_with('.') {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }
        if frac_part.len() > PRECISION {
            return Err(TypesError::TooPrecise(s.to_string()));
        }

        let int_value: i128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| TypesError::DecimalOverflow)?
        };
        let frac_value: i128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<width$}", width = PRECISION);
            padded.parse().map_err(|_| invalid())?
        };
        let raw = int_value
            .checked_mul(ONE_RAW)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or(TypesError::DecimalOverflow)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
