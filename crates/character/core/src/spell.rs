//! Spells and ritual-magic spells.
//!
//! Ritual-magic spells (id kind [`TidKind::RitualMagicSpell`]) are cast through
//! a base skill such as "Ritual Magic" and level like techniques; regular
//! spells level from their attribute with the skill point staircase.

use crate::fxp::Fxp;
use crate::ids::TidKind;
use crate::nameable::Replacements;
use crate::prereq::Prereq;
use crate::skill::{AttributeDifficulty, Difficulty, Level};
use crate::tree::{Node, NodeData};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Spell {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tech_level: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub difficulty: AttributeDifficulty,
    pub points: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub colleges: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub power_source: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub spell_class: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub casting_cost: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub casting_time: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub duration: String,
    /// Skill a ritual-magic spell is cast through.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub base_skill: String,
    /// Number of prerequisite spells of a ritual-magic spell.
    pub prerequisite_count: i64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prereq: Option<Prereq>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub level: Level,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub unsatisfied_reason: String,
}

impl Default for Spell {
    fn default() -> Self {
        Self {
            name: String::new(),
            tech_level: None,
            tags: Vec::new(),
            notes: String::new(),
            difficulty: AttributeDifficulty::new("iq", Difficulty::Hard),
            points: Fxp::ONE,
            colleges: Vec::new(),
            power_source: String::new(),
            spell_class: String::new(),
            casting_cost: String::new(),
            casting_time: String::new(),
            duration: String::new(),
            base_skill: String::new(),
            prerequisite_count: 0,
            prereq: None,
            replacements: Replacements::new(),
            level: Level::none(),
            unsatisfied_reason: String::new(),
        }
    }
}

impl Spell {
    /// Default base skill of ritual-magic spells.
    pub const RITUAL_MAGIC: &'static str = "Ritual Magic";

    pub fn new(name: impl Into<String>, difficulty: AttributeDifficulty, points: Fxp) -> Self {
        Self {
            name: name.into(),
            difficulty,
            points,
            ..Self::default()
        }
    }

    pub fn ritual(name: impl Into<String>, difficulty: Difficulty, points: Fxp, prerequisite_count: i64) -> Self {
        Self {
            name: name.into(),
            difficulty: AttributeDifficulty::new("", difficulty),
            points,
            base_skill: Self::RITUAL_MAGIC.to_string(),
            prerequisite_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_colleges(mut self, colleges: &[&str]) -> Self {
        self.colleges = colleges.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn display_name(&self) -> String {
        match self.tech_level.as_deref() {
            Some(tl) => format!("{}/TL{}", self.name, tl),
            None => self.name.clone(),
        }
    }

    pub fn has_tech_level(&self) -> bool {
        self.tech_level.as_deref().is_some_and(|tl| !tl.is_empty())
    }
}

impl NodeData for Spell {
    fn clear_unused_fields(&mut self, is_container: bool) {
        if is_container {
            *self = Self {
                name: core::mem::take(&mut self.name),
                tags: core::mem::take(&mut self.tags),
                notes: core::mem::take(&mut self.notes),
                replacements: core::mem::take(&mut self.replacements),
                points: Fxp::ZERO,
                ..Self::default()
            };
        }
    }
}

pub fn is_ritual_magic(node: &Node<Spell>) -> bool {
    node.kind() == TidKind::RitualMagicSpell
}
