//! Prerequisite trees.
//!
//! A [`Prereq`] is a boolean expression over the character's traits, skills,
//! spells, attributes and equipped gear. Evaluation writes a line per failed
//! test into an optional tooltip so the sheet can explain why an element is
//! not usable.

use std::collections::BTreeSet;

use crate::entity::Entity;
use crate::feature::{NumericCriteria, StringCriteria};
use crate::fxp::Fxp;
use crate::ids::Tid;
use crate::nameable::Replacements;
use crate::tree::{Visit, traverse};

/// Line prefix used for every top-level unsatisfied prerequisite.
pub const TOOLTIP_PREFIX: &str = "\n● ";

/// Heading of an element's unsatisfied reason.
pub const NOT_MET: &str = "Prerequisites have not been met:";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Prereq {
    #[cfg_attr(feature = "serde", serde(rename = "prereq_list"))]
    List(PrereqList),
    #[cfg_attr(feature = "serde", serde(rename = "trait_prereq"))]
    Trait(TraitPrereq),
    #[cfg_attr(feature = "serde", serde(rename = "skill_prereq"))]
    Skill(SkillPrereq),
    #[cfg_attr(feature = "serde", serde(rename = "spell_prereq"))]
    Spell(SpellPrereq),
    #[cfg_attr(feature = "serde", serde(rename = "attribute_prereq"))]
    Attribute(AttributePrereq),
    #[cfg_attr(feature = "serde", serde(rename = "equipped_equipment_prereq"))]
    EquippedEquipment(EquippedEquipmentPrereq),
}

/// All (or any) of a group of prerequisites, optionally only at some tech levels.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PrereqList {
    pub all: bool,
    /// The list only applies when the character's tech level matches.
    pub when_tl: NumericCriteria,
    pub prereqs: Vec<Prereq>,
}

impl Default for PrereqList {
    fn default() -> Self {
        Self {
            all: true,
            when_tl: NumericCriteria::default(),
            prereqs: Vec::new(),
        }
    }
}

impl PrereqList {
    pub fn all(prereqs: Vec<Prereq>) -> Self {
        Self {
            all: true,
            prereqs,
            ..Self::default()
        }
    }

    pub fn any(prereqs: Vec<Prereq>) -> Self {
        Self {
            all: false,
            prereqs,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct TraitPrereq {
    pub has: bool,
    pub name: StringCriteria,
    pub notes: StringCriteria,
    pub level: NumericCriteria,
}

impl Default for TraitPrereq {
    fn default() -> Self {
        Self {
            has: true,
            name: StringCriteria::any(),
            notes: StringCriteria::any(),
            level: NumericCriteria::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SkillPrereq {
    pub has: bool,
    pub name: StringCriteria,
    pub specialization: StringCriteria,
    pub level: NumericCriteria,
}

impl Default for SkillPrereq {
    fn default() -> Self {
        Self {
            has: true,
            name: StringCriteria::any(),
            specialization: StringCriteria::any(),
            level: NumericCriteria::default(),
        }
    }
}

/// Property of a spell a [`SpellPrereq`] inspects.
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
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpellPrereqKind {
    #[default]
    Name,
    Tag,
    College,
    /// Number of distinct colleges known.
    CollegeCount,
    Any,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SpellPrereq {
    pub has: bool,
    pub sub_type: SpellPrereqKind,
    pub qualifier: StringCriteria,
    pub quantity: NumericCriteria,
}

impl Default for SpellPrereq {
    fn default() -> Self {
        Self {
            has: true,
            sub_type: SpellPrereqKind::Name,
            qualifier: StringCriteria::any(),
            quantity: NumericCriteria::at_least(Fxp::ONE),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AttributePrereq {
    pub has: bool,
    pub which: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub combined_with: String,
    pub qualifier: NumericCriteria,
}

impl Default for AttributePrereq {
    fn default() -> Self {
        Self {
            has: true,
            which: "st".to_string(),
            combined_with: String::new(),
            qualifier: NumericCriteria::at_least(Fxp::TEN),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EquippedEquipmentPrereq {
    pub name: StringCriteria,
    pub tags: StringCriteria,
}

fn has_text(has: bool) -> &'static str {
    if has { "Has" } else { "Does not have" }
}

/// Leading integer of a tech level such as `3` or `8^`; zero if absent.
fn extract_tech_level(text: &str) -> Fxp {
    let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map(Fxp::from_int).unwrap_or(Fxp::ZERO)
}

impl Prereq {
    /// Whether `entity` meets this prerequisite. `exclude` is the element the
    /// prerequisite belongs to; it never satisfies itself. Failures are
    /// described in `tooltip`, each line starting with `prefix`.
    /// `eqp_penalty` is raised when an equipped-equipment test fails.
    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
        eqp_penalty: &mut bool,
    ) -> bool {
        match self {
            Self::List(p) => p.satisfied(entity, exclude, replacements, tooltip, prefix, eqp_penalty),
            Self::Trait(p) => p.satisfied(entity, exclude, replacements, tooltip, prefix),
            Self::Skill(p) => p.satisfied(entity, exclude, replacements, tooltip, prefix),
            Self::Spell(p) => p.satisfied(entity, exclude, replacements, tooltip, prefix),
            Self::Attribute(p) => p.satisfied(entity, tooltip, prefix),
            Self::EquippedEquipment(p) => {
                p.satisfied(entity, exclude, replacements, tooltip, prefix, eqp_penalty)
            }
        }
    }
}

impl PrereqList {
    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
        eqp_penalty: &mut bool,
    ) -> bool {
        if !self.when_tl.matches(extract_tech_level(&entity.profile.tech_level)) {
            return true;
        }
        let mut local = tooltip.is_some().then(String::new);
        let mut child_penalty = false;
        let mut count = 0;
        for prereq in &self.prereqs {
            if prereq.satisfied(entity, exclude, replacements, local.as_mut(), prefix, &mut child_penalty) {
                count += 1;
            }
        }
        let satisfied = count == self.prereqs.len() || (!self.all && count > 0);
        if !satisfied {
            if child_penalty {
                *eqp_penalty = true;
            }
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(if self.all {
                    "Requires all of:"
                } else {
                    "Requires at least one of:"
                });
                if let Some(local) = local {
                    tooltip.push_str(&local.replace('\n', "\n\u{a0}\u{a0}"));
                }
            }
        }
        satisfied
    }
}

impl TraitPrereq {
    fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let mut found = traverse(Visit::ONLY_ENABLED, &entity.traits, |node| {
            let t = &node.data;
            &node.id != exclude
                && self.name.matches(replacements, &t.name)
                && self.notes.matches(replacements, &t.notes)
                && self.level.matches(t.current_level())
        });
        if !self.has {
            found = !found;
        }
        if !found {
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(&format!(
                    "{} a trait whose name {}",
                    has_text(self.has),
                    self.name.describe(replacements)
                ));
                if self.notes.compare != crate::feature::StringCompare::Any {
                    tooltip.push_str(&format!(", notes {}", self.notes.describe(replacements)));
                }
                if self.level.compare != crate::feature::NumericCompare::Any {
                    tooltip.push_str(&format!(", and level {}", self.level.describe()));
                }
            }
        }
        found
    }
}

impl SkillPrereq {
    fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let mut found = traverse(Visit::EXCLUDE_CONTAINERS, &entity.skills, |node| {
            let s = &node.data;
            &node.id != exclude
                && self.name.matches(replacements, &s.name)
                && self.specialization.matches(replacements, &s.specialization)
                && self.level.matches(s.level.level)
        });
        if !self.has {
            found = !found;
        }
        if !found {
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(&format!(
                    "{} a skill whose name {}",
                    has_text(self.has),
                    self.name.describe(replacements)
                ));
                if self.specialization.compare != crate::feature::StringCompare::Any {
                    tooltip.push_str(&format!(
                        ", specialization {}",
                        self.specialization.describe(replacements)
                    ));
                }
                if self.level.compare != crate::feature::NumericCompare::Any {
                    tooltip.push_str(&format!(", and level {}", self.level.describe()));
                }
            }
        }
        found
    }
}

impl SpellPrereq {
    fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let mut count = 0i64;
        let mut colleges = BTreeSet::new();
        traverse(Visit::EXCLUDE_CONTAINERS, &entity.spells, |node| {
            if &node.id == exclude || !node.data.points.is_positive() {
                return false;
            }
            let s = &node.data;
            match self.sub_type {
                SpellPrereqKind::Name => {
                    if self.qualifier.matches(replacements, &s.name) {
                        count += 1;
                    }
                }
                SpellPrereqKind::Tag => {
                    if self.qualifier.matches_list(replacements, &s.tags) {
                        count += 1;
                    }
                }
                SpellPrereqKind::College => {
                    if self.qualifier.matches_list(replacements, &s.colleges) {
                        count += 1;
                    }
                }
                SpellPrereqKind::CollegeCount => {
                    colleges.extend(s.colleges.iter().map(|c| c.to_lowercase()));
                }
                SpellPrereqKind::Any => count += 1,
            }
            false
        });
        if self.sub_type == SpellPrereqKind::CollegeCount {
            count = colleges.len() as i64;
        }
        let mut satisfied = self.quantity.matches(Fxp::from_int(count));
        if !self.has {
            satisfied = !satisfied;
        }
        if !satisfied {
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(has_text(self.has));
                let subject = match self.sub_type {
                    SpellPrereqKind::Name => format!("whose name {}", self.qualifier.describe(replacements)),
                    SpellPrereqKind::Tag => format!("with a tag which {}", self.qualifier.describe(replacements)),
                    SpellPrereqKind::College => {
                        format!("whose college {}", self.qualifier.describe(replacements))
                    }
                    SpellPrereqKind::CollegeCount => "from different colleges".to_string(),
                    SpellPrereqKind::Any => "of any kind".to_string(),
                };
                tooltip.push_str(&format!(" spells {} numbering {}", subject, self.quantity.describe()));
            }
        }
        satisfied
    }
}

impl AttributePrereq {
    fn satisfied(&self, entity: &Entity, tooltip: Option<&mut String>, prefix: &str) -> bool {
        let mut value = entity.attribute_value(&self.which);
        if !self.combined_with.is_empty() {
            value += entity.attribute_value(&self.combined_with);
        }
        let mut satisfied = value != Fxp::MIN && self.qualifier.matches(value);
        if !self.has {
            satisfied = !satisfied;
        }
        if !satisfied {
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(has_text(self.has));
                tooltip.push(' ');
                tooltip.push_str(&entity.attribute_name(&self.which));
                if !self.combined_with.is_empty() {
                    tooltip.push_str(" combined with ");
                    tooltip.push_str(&entity.attribute_name(&self.combined_with));
                }
                tooltip.push_str(" which ");
                tooltip.push_str(&self.qualifier.describe());
            }
        }
        satisfied
    }
}

impl EquippedEquipmentPrereq {
    fn satisfied(
        &self,
        entity: &Entity,
        exclude: &Tid,
        replacements: &Replacements,
        tooltip: Option<&mut String>,
        prefix: &str,
        eqp_penalty: &mut bool,
    ) -> bool {
        let satisfied = traverse(Visit::empty(), &entity.carried_equipment, |node| {
            let e = &node.data;
            &node.id != exclude
                && e.is_active()
                && self.name.matches(replacements, &e.name)
                && self.tags.matches_list(replacements, &e.tags)
        });
        if !satisfied {
            *eqp_penalty = true;
            if let Some(tooltip) = tooltip {
                tooltip.push_str(prefix);
                tooltip.push_str(&format!(
                    "Has equipment which is equipped and whose name {}",
                    self.name.describe(replacements)
                ));
                if self.tags.compare != crate::feature::StringCompare::Any {
                    tooltip.push_str(&format!(", and at least one tag which {}", self.tags.describe(replacements)));
                }
            }
        }
        satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_level_extraction() {
        assert_eq!(extract_tech_level("8^"), Fxp::from_int(8));
        assert_eq!(extract_tech_level(" 12 "), Fxp::from_int(12));
        assert_eq!(extract_tech_level(""), Fxp::ZERO);
    }
}
