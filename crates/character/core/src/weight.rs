//! Weights and weight units.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use crate::fxp::Fxp;

/// Unit a weight is entered or displayed in.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightUnit {
    #[default]
    #[strum(serialize = "lb")]
    #[cfg_attr(feature = "serde", serde(rename = "lb"))]
    Pound,
    #[strum(serialize = "#")]
    #[cfg_attr(feature = "serde", serde(rename = "#"))]
    PoundAlt,
    #[strum(serialize = "oz")]
    #[cfg_attr(feature = "serde", serde(rename = "oz"))]
    Ounce,
    #[strum(serialize = "tn")]
    #[cfg_attr(feature = "serde", serde(rename = "tn"))]
    Ton,
    #[strum(serialize = "kg")]
    #[cfg_attr(feature = "serde", serde(rename = "kg"))]
    Kilogram,
    #[strum(serialize = "g")]
    #[cfg_attr(feature = "serde", serde(rename = "g"))]
    Gram,
}

impl WeightUnit {
    /// Converts `value` in this unit to pounds. Metric units use the game's
    /// simplified 1 kg = 2 lb rule.
    pub fn to_pounds(self, value: Fxp) -> Fxp {
        match self {
            Self::Pound | Self::PoundAlt => value,
            Self::Ounce => value / Fxp::from_int(16),
            Self::Ton => value * Fxp::from_int(2000),
            Self::Kilogram => value * Fxp::TWO,
            Self::Gram => value / Fxp::from_int(500),
        }
    }

    pub fn from_pounds(self, pounds: Fxp) -> Fxp {
        match self {
            Self::Pound | Self::PoundAlt => pounds,
            Self::Ounce => pounds * Fxp::from_int(16),
            Self::Ton => pounds / Fxp::from_int(2000),
            Self::Kilogram => pounds / Fxp::TWO,
            Self::Gram => pounds * Fxp::from_int(500),
        }
    }

    /// Splits a trailing unit off `text`, falling back to `default`.
    pub fn split_trailing(text: &str, default: Self) -> (&str, Self) {
        let trimmed = text.trim();
        let boundary = trimmed
            .rfind(|c: char| c.is_ascii_digit() || c == '.')
            .map(|i| i + 1)
            .unwrap_or(0);
        let (number, suffix) = trimmed.split_at(boundary);
        let suffix = suffix.trim();
        if suffix.is_empty() {
            return (number.trim(), default);
        }
        match suffix.parse::<Self>() {
            Ok(unit) => (number.trim(), unit),
            Err(_) => (number.trim(), default),
        }
    }
}

/// A weight, stored in pounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(pub Fxp);

impl Weight {
    pub const ZERO: Self = Self(Fxp::ZERO);

    pub fn from_units(value: Fxp, unit: WeightUnit) -> Self {
        Self(unit.to_pounds(value))
    }

    pub fn pounds(lb: i64) -> Self {
        Self(Fxp::from_int(lb))
    }

    pub fn in_units(self, unit: WeightUnit) -> Fxp {
        unit.from_pounds(self.0)
    }

    /// Parses text such as `12.5 lb` or `3kg`; unparsable numbers give zero.
    pub fn parse(text: &str, default_unit: WeightUnit) -> Self {
        let (number, unit) = WeightUnit::split_trailing(text, default_unit);
        let value = number.parse::<Fxp>().unwrap_or(Fxp::ZERO);
        Self::from_units(value, unit)
    }

    pub fn format(self, unit: WeightUnit) -> String {
        format!("{} {}", self.in_units(unit), unit)
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn scaled(self, factor: Fxp) -> Self {
        Self(self.0 * factor)
    }
}

impl Add for Weight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Weight {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, WeightUnit::Pound)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Weight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Weight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(Fxp),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Self(value),
            Raw::Text(text) => Self::parse(&text, WeightUnit::Pound),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trailing_units() {
        assert_eq!(Weight::parse("12 lb", WeightUnit::Pound), Weight::pounds(12));
        assert_eq!(Weight::parse("3kg", WeightUnit::Pound), Weight::pounds(6));
        assert_eq!(Weight::parse("32 oz", WeightUnit::Pound), Weight::pounds(2));
        assert_eq!(Weight::parse("4", WeightUnit::Kilogram), Weight::pounds(8));
        assert_eq!(Weight::parse("junk", WeightUnit::Pound), Weight::ZERO);
    }

    #[test]
    fn converts_between_units() {
        let w = Weight::pounds(4000);
        assert_eq!(w.in_units(WeightUnit::Ton), Fxp::TWO);
        assert_eq!(w.format(WeightUnit::Kilogram), "2000 kg");
    }
}
