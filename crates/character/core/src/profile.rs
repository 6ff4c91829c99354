//! Descriptive profile of a character.

use crate::fxp::Fxp;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Profile {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub player_name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub gender: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub age: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub height: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub weight: String,
    pub tech_level: String,
    pub size_modifier: i64,

    /// Sum of size-modifier bonuses from features.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub size_modifier_bonus: Fxp,
}

impl Profile {
    pub fn new(name: impl Into<String>, tech_level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tech_level: tech_level.into(),
            ..Self::default()
        }
    }

    /// Size modifier including feature bonuses.
    pub fn adjusted_size_modifier(&self) -> i64 {
        self.size_modifier + self.size_modifier_bonus.as_int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_size_modifier_adds_whole_bonus() {
        let mut profile = Profile::new("Dai", "3");
        profile.size_modifier = -1;
        profile.size_modifier_bonus = Fxp::from_ratio(5, 2);
        assert_eq!(profile.adjusted_size_modifier(), 1);
    }
}
