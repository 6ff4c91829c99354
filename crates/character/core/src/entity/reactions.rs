//! Reaction and conditional modifier lists.

use crate::feature::{Bonus, BonusCore};
use crate::ids::TidKind;
use crate::reaction::{ConditionalModifier, merge};
use crate::traits::{SelfControlRoll, SelfControlRollAdj};
use crate::tree::{Visit, traverse};

use super::Entity;

fn source_of(core: &BonusCore) -> String {
    let Some(owner) = core.owner.as_ref() else {
        return "from unknown source".to_string();
    };
    let kind = match owner.id.kind() {
        TidKind::Trait | TidKind::TraitContainer => "trait",
        TidKind::Equipment | TidKind::EquipmentContainer => "equipment",
        TidKind::Skill | TidKind::SkillContainer | TidKind::Technique => "skill",
        TidKind::Spell | TidKind::SpellContainer | TidKind::RitualMagicSpell => "spell",
        _ => "element",
    };
    format!("from {kind} {}", owner.name)
}

impl Entity {
    /// Reaction modifiers grouped by situation, sorted by situation.
    /// Reaction penalties of self-control traits appear as "from others
    /// when ... is triggered".
    pub fn reactions(&self) -> Vec<ConditionalModifier> {
        let mut list = Vec::new();
        for bonus in self.reaction_bonuses() {
            merge(&mut list, source_of(bonus.core()), &bonus.situation, bonus.adjusted_amount());
        }
        traverse(Visit::ENABLED_LEAVES, &self.traits, |node| {
            let t = &node.data;
            if t.self_control_roll != SelfControlRoll::None && t.self_control_adj == SelfControlRollAdj::ReactionPenalty {
                let amount = t.self_control_adj.adjustment(t.self_control_roll);
                if !amount.is_zero() {
                    let from = format!("from others when {} is triggered", t.name);
                    merge(&mut list, format!("from trait {}", t.name), &from, amount);
                }
            }
            false
        });
        list.sort_by(|a, b| a.from.cmp(&b.from));
        list
    }

    /// Situational modifiers grouped by situation, sorted by situation.
    pub fn conditional_modifiers(&self) -> Vec<ConditionalModifier> {
        let mut list = Vec::new();
        for bonus in self.conditional_modifier_bonuses() {
            merge(&mut list, source_of(bonus.core()), &bonus.situation, bonus.adjusted_amount());
        }
        list.sort_by(|a, b| a.from.cmp(&b.from));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, ReactionBonus};
    use crate::fxp::Fxp;
    use crate::traits::Trait;
    use crate::tree::Node;

    #[test]
    fn reactions_merge_features_and_self_control() {
        let mut entity = Entity::default();
        let appearance = Trait::new("Attractive", Fxp::FOUR).with_features(vec![Feature::ReactionBonus(ReactionBonus {
            core: BonusCore::new(Fxp::ONE),
            situation: "from everyone".into(),
        })]);
        let mut temper = Trait::new("Bad Temper", Fxp::from_int(-10));
        temper.self_control_roll = SelfControlRoll::Cr12;
        temper.self_control_adj = SelfControlRollAdj::ReactionPenalty;
        entity.traits.push(Node::new(TidKind::Trait, appearance));
        entity.traits.push(Node::new(TidKind::Trait, temper));
        entity.process_features();

        let reactions = entity.reactions();
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[0].from, "from everyone");
        assert_eq!(reactions[0].tooltip(), "+1 from trait Attractive");
        assert_eq!(reactions[1].from, "from others when Bad Temper is triggered");
        assert!(reactions[1].total().is_negative());
        assert!(entity.conditional_modifiers().is_empty());
    }
}
