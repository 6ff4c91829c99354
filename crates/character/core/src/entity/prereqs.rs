//! Prerequisite evaluation for every element.
//!
//! Results are gathered against an immutable view of the character and
//! written back afterwards. A skill or spell whose equipped-equipment
//! prerequisite fails also takes a penalty bonus for the rest of the pass.

use std::sync::Arc;

use crate::feature::{BonusCore, BonusOwner, SkillBonus, SpellBonus, SpellMatch, StringCriteria};
use crate::fxp::Fxp;
use crate::ids::Tid;
use crate::nameable::Replacements;
use crate::prereq::{NOT_MET, Prereq, TOOLTIP_PREFIX};
use crate::skill::is_technique;
use crate::spell::is_ritual_magic;
use crate::tree::{Node, NodeData, Visit, find_mut, traverse};

use super::Entity;

const EQUIPMENT_PENALTY: Fxp = Fxp::from_int(-5);
const EQUIPMENT_PENALTY_WITH_TL: Fxp = Fxp::from_int(-10);

/// Outcome of checking one element.
struct Verdict {
    id: Tid,
    reason: String,
    equipment_penalty: bool,
}

impl Verdict {
    fn unsatisfied(&mut self, tooltip: &str) {
        if self.reason.is_empty() {
            self.reason.push_str(NOT_MET);
        }
        self.reason.push_str(tooltip);
    }
}

fn penalty_amount(has_tech_level: bool) -> Fxp {
    if has_tech_level { EQUIPMENT_PENALTY_WITH_TL } else { EQUIPMENT_PENALTY }
}

fn apply_reasons<T, F>(roots: &mut [Node<T>], verdicts: &[Verdict], mut set: F)
where
    T: NodeData,
    F: FnMut(&mut T, String),
{
    for verdict in verdicts {
        if let Some(node) = find_mut(roots, &verdict.id) {
            set(&mut node.data, verdict.reason.clone());
        }
    }
}

impl Entity {
    fn check_prereq(&self, id: &Tid, prereq: Option<&Prereq>, replacements: &Replacements) -> Verdict {
        let mut verdict = Verdict {
            id: id.clone(),
            reason: String::new(),
            equipment_penalty: false,
        };
        if let Some(prereq) = prereq {
            let mut tooltip = String::new();
            let mut penalty = false;
            if !prereq.satisfied(self, id, replacements, Some(&mut tooltip), TOOLTIP_PREFIX, &mut penalty) {
                verdict.unsatisfied(&tooltip);
                verdict.equipment_penalty = penalty;
            }
        }
        verdict
    }

    /// Evaluates every prerequisite and records why elements are unusable.
    pub fn process_prereqs(&mut self) {
        let mut traits = Vec::new();
        traverse(Visit::ENABLED_LEAVES, &self.traits, |node| {
            traits.push(self.check_prereq(&node.id, node.data.prereq.as_ref(), &node.data.replacements));
            false
        });

        let mut skills = Vec::new();
        traverse(Visit::EXCLUDE_CONTAINERS, &self.skills, |node| {
            let mut verdict = self.check_prereq(&node.id, node.data.prereq.as_ref(), &node.data.replacements);
            if is_technique(node) {
                let mut tooltip = String::new();
                if !self.technique_satisfied(node, &mut tooltip, TOOLTIP_PREFIX) {
                    verdict.unsatisfied(&tooltip);
                }
            }
            skills.push(verdict);
            false
        });

        let mut spells = Vec::new();
        traverse(Visit::EXCLUDE_CONTAINERS, &self.spells, |node| {
            let mut verdict = self.check_prereq(&node.id, node.data.prereq.as_ref(), &node.data.replacements);
            if is_ritual_magic(node) {
                let mut tooltip = String::new();
                if !self.ritual_magic_satisfied(node, &mut tooltip, TOOLTIP_PREFIX) {
                    verdict.unsatisfied(&tooltip);
                }
            }
            spells.push(verdict);
            false
        });

        let mut equipment = Vec::new();
        for forest in [&self.carried_equipment, &self.other_equipment] {
            traverse(Visit::empty(), forest, |node| {
                equipment.push(self.check_prereq(&node.id, node.data.prereq.as_ref(), &node.data.replacements));
                false
            });
        }

        self.push_equipment_penalties(&skills, &spells);

        apply_reasons(&mut self.traits, &traits, |t, reason| t.unsatisfied_reason = reason);
        apply_reasons(&mut self.skills, &skills, |s, reason| s.unsatisfied_reason = reason);
        apply_reasons(&mut self.spells, &spells, |s, reason| s.unsatisfied_reason = reason);
        apply_reasons(&mut self.carried_equipment, &equipment, |e, reason| e.unsatisfied_reason = reason);
        apply_reasons(&mut self.other_equipment, &equipment, |e, reason| e.unsatisfied_reason = reason);
    }

    fn push_equipment_penalties(&mut self, skills: &[Verdict], spells: &[Verdict]) {
        let mut skill_penalties = Vec::new();
        for verdict in skills.iter().filter(|v| v.equipment_penalty) {
            let Some(node) = crate::tree::find(&self.skills, &verdict.id) else {
                continue;
            };
            let s = &node.data;
            let mut core = BonusCore::new(penalty_amount(s.has_tech_level()));
            core.owner = Some(BonusOwner::new(node.id.clone(), s.display_name(), Arc::new(s.replacements.clone())));
            skill_penalties.push(SkillBonus::for_skill(&s.name, &s.specialization, core));
        }

        let mut spell_penalties = Vec::new();
        for verdict in spells.iter().filter(|v| v.equipment_penalty) {
            let Some(node) = crate::tree::find(&self.spells, &verdict.id) else {
                continue;
            };
            let s = &node.data;
            let mut core = BonusCore::new(penalty_amount(s.has_tech_level()));
            core.owner = Some(BonusOwner::new(node.id.clone(), s.display_name(), Arc::new(s.replacements.clone())));
            spell_penalties.push(SpellBonus {
                core,
                match_kind: SpellMatch::SpellName,
                name: StringCriteria::is(s.name.clone()),
                tags: StringCriteria::any(),
            });
        }

        for bonus in skill_penalties {
            self.features.push_skill_bonus(bonus);
        }
        for bonus in spell_penalties {
            self.features.push_spell_bonus(bonus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{NumericCriteria, StringCompare};
    use crate::ids::TidKind;
    use crate::prereq::{AttributePrereq, EquippedEquipmentPrereq, PrereqList};
    use crate::skill::{AttributeDifficulty, Difficulty, Skill};
    use crate::traits::Trait;

    #[test]
    fn failed_prereq_sets_reason() {
        let mut entity = Entity::default();
        let mut t = Trait::new("Weapon Master", Fxp::from_int(20));
        t.prereq = Some(Prereq::Attribute(AttributePrereq {
            has: true,
            which: "dx".into(),
            combined_with: String::new(),
            qualifier: NumericCriteria::at_least(Fxp::from_int(14)),
        }));
        entity.traits.push(Node::new(TidKind::Trait, t));
        entity.process_prereqs();
        let reason = &entity.traits[0].data.unsatisfied_reason;
        assert!(reason.starts_with(NOT_MET), "{reason}");
        assert!(reason.contains(TOOLTIP_PREFIX));

        entity.attributes.get_mut("dx").unwrap().adjustment = Fxp::FOUR;
        entity.process_prereqs();
        assert!(entity.traits[0].data.unsatisfied_reason.is_empty());
    }

    #[test]
    fn missing_equipment_penalizes_skill() {
        let mut entity = Entity::default();
        let mut skill = Skill::new("Lockpicking", AttributeDifficulty::new("iq", Difficulty::Average), Fxp::ONE);
        skill.prereq = Some(Prereq::List(PrereqList::all(vec![Prereq::EquippedEquipment(
            EquippedEquipmentPrereq {
                name: StringCriteria::new(StringCompare::Is, "Lockpicks"),
                tags: StringCriteria::any(),
            },
        )])));
        entity.skills.push(Node::new(TidKind::Skill, skill));
        entity.process_prereqs();
        assert!(!entity.skills[0].data.unsatisfied_reason.is_empty());
        assert_eq!(entity.skill_bonus_for("Lockpicking", "", &[], None), Fxp::from_int(-5));
    }
}
