//! Matching criteria used by bonuses and prerequisites.
//!
//! All string comparisons are case-insensitive, and the qualifier is expanded
//! through the owning element's nameable replacements before comparing.

use crate::fxp::Fxp;
use crate::nameable::{self, Replacements};

/// How a [`StringCriteria`] compares its qualifier with a candidate.
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
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StringCompare {
    #[default]
    Any,
    Is,
    IsNot,
    Contains,
    DoesNotContain,
    StartsWith,
    DoesNotStartWith,
    EndsWith,
    DoesNotEndWith,
}

impl StringCompare {
    const fn is_negated(self) -> bool {
        matches!(
            self,
            Self::IsNot | Self::DoesNotContain | Self::DoesNotStartWith | Self::DoesNotEndWith
        )
    }

    /// Short phrase used in tooltips, e.g. `starts with`.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Any => "is anything",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
            Self::StartsWith => "starts with",
            Self::DoesNotStartWith => "does not start with",
            Self::EndsWith => "ends with",
            Self::DoesNotEndWith => "does not end with",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct StringCriteria {
    pub compare: StringCompare,
    pub qualifier: String,
}

impl StringCriteria {
    pub fn new(compare: StringCompare, qualifier: impl Into<String>) -> Self {
        Self {
            compare,
            qualifier: qualifier.into(),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn is(qualifier: impl Into<String>) -> Self {
        Self::new(StringCompare::Is, qualifier)
    }

    pub fn matches(&self, replacements: &Replacements, value: &str) -> bool {
        if self.compare == StringCompare::Any {
            return true;
        }
        let qualifier = nameable::apply(&self.qualifier, replacements).to_lowercase();
        let value = value.to_lowercase();
        match self.compare {
            StringCompare::Any => true,
            StringCompare::Is => value == qualifier,
            StringCompare::IsNot => value != qualifier,
            StringCompare::Contains => value.contains(&qualifier),
            StringCompare::DoesNotContain => !value.contains(&qualifier),
            StringCompare::StartsWith => value.starts_with(&qualifier),
            StringCompare::DoesNotStartWith => !value.starts_with(&qualifier),
            StringCompare::EndsWith => value.ends_with(&qualifier),
            StringCompare::DoesNotEndWith => !value.ends_with(&qualifier),
        }
    }

    /// Tag-list matching. Positive comparisons need one hit; negated ones
    /// need every entry to pass. An empty list is matched as `""`.
    pub fn matches_list(&self, replacements: &Replacements, values: &[String]) -> bool {
        if values.is_empty() {
            return self.matches(replacements, "");
        }
        let hits = values.iter().filter(|v| self.matches(replacements, v)).count();
        if self.compare.is_negated() {
            hits == values.len()
        } else {
            hits > 0
        }
    }

    pub fn describe(&self, replacements: &Replacements) -> String {
        match self.compare {
            StringCompare::Any => self.compare.describe().to_string(),
            compare => format!(
                "{} \"{}\"",
                compare.describe(),
                nameable::apply(&self.qualifier, replacements)
            ),
        }
    }
}

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
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NumericCompare {
    #[default]
    Any,
    Equals,
    NotEquals,
    AtLeast,
    AtMost,
}

impl NumericCompare {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Any => "is anything",
            Self::Equals => "is",
            Self::NotEquals => "is not",
            Self::AtLeast => "at least",
            Self::AtMost => "at most",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct NumericCriteria {
    pub compare: NumericCompare,
    pub qualifier: Fxp,
}

impl NumericCriteria {
    pub const fn new(compare: NumericCompare, qualifier: Fxp) -> Self {
        Self { compare, qualifier }
    }

    pub fn at_least(qualifier: Fxp) -> Self {
        Self::new(NumericCompare::AtLeast, qualifier)
    }

    pub fn matches(&self, value: Fxp) -> bool {
        match self.compare {
            NumericCompare::Any => true,
            NumericCompare::Equals => value == self.qualifier,
            NumericCompare::NotEquals => value != self.qualifier,
            NumericCompare::AtLeast => value >= self.qualifier,
            NumericCompare::AtMost => value <= self.qualifier,
        }
    }

    pub fn describe(&self) -> String {
        match self.compare {
            NumericCompare::Any => self.compare.describe().to_string(),
            compare => format!("{} {}", compare.describe(), self.qualifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_matching_ignores_case() {
        let none = Replacements::new();
        assert!(StringCriteria::is("broadsword").matches(&none, "Broadsword"));
        assert!(StringCriteria::new(StringCompare::StartsWith, "broad").matches(&none, "BroadSword"));
        assert!(!StringCriteria::new(StringCompare::DoesNotContain, "SWORD").matches(&none, "Broadsword"));
        assert!(StringCriteria::any().matches(&none, "anything"));
    }

    #[test]
    fn qualifier_expands_placeholders() {
        let mut map = Replacements::new();
        map.insert("Weapon".into(), "Axe/Mace".into());
        assert!(StringCriteria::is("@Weapon@").matches(&map, "axe/mace"));
    }

    #[test]
    fn list_matching_positive_and_negated() {
        let none = Replacements::new();
        let tags = vec!["Combat".to_string(), "Melee".to_string()];
        assert!(StringCriteria::is("melee").matches_list(&none, &tags));
        assert!(!StringCriteria::new(StringCompare::IsNot, "melee").matches_list(&none, &tags));
        assert!(StringCriteria::new(StringCompare::IsNot, "ranged").matches_list(&none, &tags));
        assert!(StringCriteria::any().matches_list(&none, &[]));
        assert!(!StringCriteria::is("melee").matches_list(&none, &[]));
    }

    #[test]
    fn numeric_criteria_bounds() {
        let c = NumericCriteria::at_least(Fxp::TEN);
        assert!(c.matches(Fxp::TEN));
        assert!(!c.matches(Fxp::SIX));
        assert_eq!(c.describe(), "at least 10");
    }
}
