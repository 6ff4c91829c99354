//! Fixed-point decimal arithmetic.
//!
//! Every quantity on a sheet (points, levels, weights, costs) is an [`Fxp`]:
//! a signed value with four decimal places stored as a scaled `i64`. Addition
//! and subtraction saturate, multiplication and division go through `i128`,
//! and division by zero yields zero so that a malformed modifier can never
//! abort a recalculation.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

/// Signed fixed-point number with four decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fxp(i64);

impl Fxp {
    /// Raw units per whole number.
    pub const SCALE: i64 = 10_000;

    /// Sentinel for "no level": below every reachable value.
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    pub const ZERO: Self = Self::from_int(0);
    pub const HALF: Self = Self(Self::SCALE / 2);
    pub const ONE: Self = Self::from_int(1);
    pub const TWO: Self = Self::from_int(2);
    pub const THREE: Self = Self::from_int(3);
    pub const FOUR: Self = Self::from_int(4);
    pub const FIVE: Self = Self::from_int(5);
    pub const SIX: Self = Self::from_int(6);
    pub const TEN: Self = Self::from_int(10);
    pub const TWENTY: Self = Self::from_int(20);
    pub const EIGHTY: Self = Self::from_int(80);
    pub const HUNDRED: Self = Self::from_int(100);

    pub const fn from_int(value: i64) -> Self {
        Self(value * Self::SCALE)
    }

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Builds `numerator / denominator`, yielding zero for a zero denominator.
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Self::from_int(numerator) / Self::from_int(denominator)
    }

    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * Self::SCALE as f64).round();
        if scaled >= i64::MAX as f64 {
            Self::MAX
        } else if scaled <= i64::MIN as f64 {
            Self::MIN
        } else {
            Self(scaled as i64)
        }
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Whole part, truncated toward zero.
    pub const fn as_int(self) -> i64 {
        self.0 / Self::SCALE
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Drops the fractional part, rounding toward zero.
    pub const fn trunc(self) -> Self {
        Self(self.0 / Self::SCALE * Self::SCALE)
    }

    pub const fn floor(self) -> Self {
        let t = self.trunc();
        if self.0 < 0 && t.0 != self.0 {
            Self(t.0.saturating_sub(Self::SCALE))
        } else {
            t
        }
    }

    pub const fn ceil(self) -> Self {
        let t = self.trunc();
        if self.0 > 0 && t.0 != self.0 {
            Self(t.0.saturating_add(Self::SCALE))
        } else {
            t
        }
    }

    /// Rounds to the nearest whole number, halves away from zero.
    pub const fn round(self) -> Self {
        let half = Self::SCALE / 2;
        let shifted = if self.0 < 0 {
            self.0.saturating_sub(half)
        } else {
            self.0.saturating_add(half)
        };
        Self(shifted / Self::SCALE * Self::SCALE)
    }

    /// Rounds down when `round_down` is set, up otherwise.
    pub const fn apply_rounding(self, round_down: bool) -> Self {
        if round_down { self.floor() } else { self.ceil() }
    }

    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    pub fn clamp(self, low: Self, high: Self) -> Self {
        Ord::clamp(self, low, high)
    }

    /// Formats with an explicit leading `+` for non-negative values.
    pub fn string_with_sign(self) -> String {
        if self.0 >= 0 {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }
}

impl Add for Fxp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fxp {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fxp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fxp {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Fxp {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let product = i128::from(self.0) * i128::from(rhs.0) / i128::from(Self::SCALE);
        Self(saturate(product))
    }
}

impl MulAssign for Fxp {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for Fxp {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return Self::ZERO;
        }
        let quotient = i128::from(self.0) * i128::from(Self::SCALE) / i128::from(rhs.0);
        Self(saturate(quotient))
    }
}

impl DivAssign for Fxp {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Neg for Fxp {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Fxp {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Fxp> for Fxp {
    fn sum<I: Iterator<Item = &'a Fxp>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<i64> for Fxp {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl From<i32> for Fxp {
    fn from(value: i32) -> Self {
        Self::from_int(i64::from(value))
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl fmt::Display for Fxp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = magnitude / scale;
        let frac = magnitude % scale;
        if negative {
            f.write_str("-")?;
        }
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:04}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

/// Failure to parse a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid fixed-point number: {input:?}")]
pub struct ParseFxpError {
    pub input: String,
}

impl crate::error::SheetError for ParseFxpError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "PARSE_FXP"
    }
}

impl FromStr for Fxp {
    type Err = ParseFxpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFxpError {
            input: s.to_string(),
        };
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let (negative, body) = match cleaned.as_bytes().first() {
            Some(b'-') => (true, &cleaned[1..]),
            Some(b'+') => (false, &cleaned[1..]),
            _ => (false, cleaned.as_str()),
        };
        if body.is_empty() {
            return Err(err());
        }
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        // Digits beyond the fourth decimal place are dropped.
        let mut frac_value: i64 = 0;
        for (i, c) in frac.chars().take(4).enumerate() {
            let digit = i64::from(c as u8 - b'0');
            frac_value += digit * 10_i64.pow(3 - i as u32);
        }
        let raw = whole_value
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(frac_value))
            .ok_or_else(err)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fxp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0 % Self::SCALE == 0 {
            serializer.serialize_i64(self.as_int())
        } else {
            serializer.serialize_f64(self.to_f64())
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Fxp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FxpVisitor;

        impl serde::de::Visitor<'_> for FxpVisitor {
            type Value = Fxp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a decimal string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Fxp, E> {
                Ok(Fxp::from_int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Fxp, E> {
                i64::try_from(v)
                    .map(Fxp::from_int)
                    .map_err(|_| E::custom("number out of range"))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Fxp, E> {
                Ok(Fxp::from_f64(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Fxp, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FxpVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fxp {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_decimals() {
        assert_eq!(fx("1.5").to_string(), "1.5");
        assert_eq!(fx("-0.25").to_string(), "-0.25");
        assert_eq!(fx("12").to_string(), "12");
        assert_eq!(fx("3.14159").to_string(), "3.1415");
        assert!("abc".parse::<Fxp>().is_err());
        assert!("".parse::<Fxp>().is_err());
    }

    #[test]
    fn rounding_modes() {
        assert_eq!(fx("2.5").round(), Fxp::THREE);
        assert_eq!(fx("-2.5").round(), -Fxp::THREE);
        assert_eq!(fx("1.2").round(), Fxp::ONE);
        assert_eq!(fx("-1.7").trunc(), -Fxp::ONE);
        assert_eq!(fx("-1.2").floor(), -Fxp::TWO);
        assert_eq!(fx("1.2").ceil(), Fxp::TWO);
        assert_eq!(fx("1.2").apply_rounding(true), Fxp::ONE);
        assert_eq!(fx("1.2").apply_rounding(false), Fxp::TWO);
    }

    #[test]
    fn arithmetic_is_decimal_exact() {
        // 0.1 + 0.2 stays exactly 0.3
        assert_eq!(fx("0.1") + fx("0.2"), fx("0.3"));
        assert_eq!(fx("1.5") * fx("4"), Fxp::SIX);
        assert_eq!(Fxp::TEN / Fxp::FOUR, fx("2.5"));
        assert_eq!(Fxp::ONE / Fxp::ZERO, Fxp::ZERO);
    }

    #[test]
    fn min_sentinel_saturates() {
        assert_eq!(Fxp::MIN - Fxp::ONE, Fxp::MIN);
        assert!(Fxp::MIN < -Fxp::from_int(1_000_000));
    }

    #[test]
    fn sign_formatting() {
        assert_eq!(Fxp::THREE.string_with_sign(), "+3");
        assert_eq!((-Fxp::TWO).string_with_sign(), "-2");
        assert_eq!(Fxp::ZERO.string_with_sign(), "+0");
    }
}
