//! Skills and techniques.
//!
//! A skill node is a technique when its id kind is [`TidKind::Technique`]; the
//! two share one payload type. Level computation lives in [`level`] and is
//! driven by [`crate::entity::Entity`].

pub mod default;
pub mod level;

pub use default::SkillDefault;
pub use level::{
    AttributeDifficulty, Difficulty, Exclusions, Level, LevelOracle, RitualMagicInput,
    SkillLevelInput, SpellLevelInput, TechniqueLevelInput, calculate_ritual_magic_spell_level,
    calculate_skill_level, calculate_spell_level, calculate_technique_level,
};

use crate::feature::Features;
use crate::fxp::Fxp;
use crate::ids::TidKind;
use crate::nameable::Replacements;
use crate::prereq::Prereq;
use crate::tree::{Node, NodeData};

/// Payload of a skill, technique or skill container node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Skill {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub specialization: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tech_level: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub difficulty: AttributeDifficulty,
    pub points: Fxp,
    /// Multiplier applied to the encumbrance penalty (0 = unaffected).
    pub encumbrance_penalty_multiplier: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub defaults: Vec<SkillDefault>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub technique_default: Option<SkillDefault>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub technique_limit_modifier: Option<Fxp>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub features: Features,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prereq: Option<Prereq>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub defaulted_from: Option<SkillDefault>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub level: Level,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub unsatisfied_reason: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, difficulty: AttributeDifficulty, points: Fxp) -> Self {
        Self {
            name: name.into(),
            difficulty,
            points,
            ..Self::default()
        }
    }

    /// Technique payload defaulting to `default`.
    pub fn technique(name: impl Into<String>, difficulty: Difficulty, points: Fxp, default: SkillDefault) -> Self {
        Self {
            name: name.into(),
            difficulty: AttributeDifficulty::new("", difficulty),
            points,
            technique_default: Some(default),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: Vec<SkillDefault>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Display name: `Name/TL3 (Specialization)`. Also the exclusion key.
    pub fn display_name(&self) -> String {
        let mut out = self.name.clone();
        if let Some(tl) = self.tech_level.as_deref() {
            out.push_str("/TL");
            out.push_str(tl);
        }
        if !self.specialization.is_empty() {
            out.push_str(" (");
            out.push_str(&self.specialization);
            out.push(')');
        }
        out
    }

    pub fn has_tech_level(&self) -> bool {
        self.tech_level.as_deref().is_some_and(|tl| !tl.is_empty())
    }
}

impl NodeData for Skill {
    fn clear_unused_fields(&mut self, is_container: bool) {
        if is_container {
            let keep = Self {
                name: core::mem::take(&mut self.name),
                tags: core::mem::take(&mut self.tags),
                notes: core::mem::take(&mut self.notes),
                replacements: core::mem::take(&mut self.replacements),
                ..Self::default()
            };
            *self = keep;
        }
    }
}

/// Whether a skill node is a technique.
pub fn is_technique(node: &Node<Skill>) -> bool {
    node.kind() == TidKind::Technique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_includes_tech_level_and_specialization() {
        let mut skill = Skill::new("Guns", AttributeDifficulty::new("dx", Difficulty::Easy), Fxp::ONE)
            .with_specialization("Pistol");
        skill.tech_level = Some("8".into());
        assert_eq!(skill.display_name(), "Guns/TL8 (Pistol)");
    }

    #[test]
    fn containers_drop_calculation_fields() {
        let mut node = Node::new(
            TidKind::SkillContainer,
            Skill::new("Combat", AttributeDifficulty::default(), Fxp::FOUR),
        );
        node.clear_unused_fields();
        assert_eq!(node.data.name, "Combat");
        assert_eq!(node.data.points, Fxp::ZERO);
    }
}
