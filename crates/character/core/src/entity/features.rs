//! Feature aggregation.
//!
//! Every pass rebuilds the buckets from scratch. Each bonus is stamped with
//! its owner, optional sub-owner (a modifier) and leveling factor before it
//! is stored.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::feature::{
    AttributeBonus, Bonus, BonusOwner, ConditionalModifierBonus, CostReduction, DrBonus, Feature,
    ReactionBonus, SkillBonus, SkillPointBonus, SpellBonus, SpellPointBonus, StrengthLimitation,
    WeaponBonus, WeaponSelection,
};
use crate::fxp::Fxp;
use crate::ids::Tid;
use crate::nameable::Replacements;
use crate::tree::{Visit, traverse};

use super::Entity;

/// Cost reductions never exceed this percentage.
pub const MAX_COST_REDUCTION: Fxp = Fxp::EIGHTY;

/// Aggregated bonuses, one bucket per feature kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct FeatureSet {
    pub attribute_bonuses: Vec<AttributeBonus>,
    pub cost_reductions: Vec<CostReduction>,
    pub dr_bonuses: Vec<DrBonus>,
    pub skill_bonuses: Vec<SkillBonus>,
    pub skill_point_bonuses: Vec<SkillPointBonus>,
    pub spell_bonuses: Vec<SpellBonus>,
    pub spell_point_bonuses: Vec<SpellPointBonus>,
    pub weapon_bonuses: Vec<WeaponBonus>,
    pub reaction_bonuses: Vec<ReactionBonus>,
    pub conditional_modifiers: Vec<ConditionalModifierBonus>,
}

impl FeatureSet {
    fn add(&mut self, mut feature: Feature, owner: &BonusOwner, sub_owner: Option<&BonusOwner>, level: Fxp) {
        feature.stamp(owner.clone(), sub_owner.cloned(), level);
        match feature {
            Feature::AttributeBonus(b) => self.attribute_bonuses.push(b),
            Feature::CostReduction(c) => self.cost_reductions.push(c),
            Feature::DrBonus(b) => self.dr_bonuses.push(b),
            Feature::SkillBonus(b) => self.skill_bonuses.push(b),
            Feature::SkillPointBonus(b) => self.skill_point_bonuses.push(b),
            Feature::SpellBonus(b) => self.spell_bonuses.push(b),
            Feature::SpellPointBonus(b) => self.spell_point_bonuses.push(b),
            Feature::WeaponBonus(b) => {
                if b.selection == WeaponSelection::Unknown {
                    tracing::warn!(owner = %owner.name, "skipping weapon bonus with unknown selection");
                } else {
                    self.weapon_bonuses.push(b);
                }
            }
            Feature::ReactionBonus(b) => self.reaction_bonuses.push(b),
            Feature::ConditionalModifier(b) => self.conditional_modifiers.push(b),
            // Consumed by the equipment weight calculation.
            Feature::ContainedWeightReduction(_) => {}
            Feature::Unknown => {
                tracing::warn!(owner = %owner.name, "skipping unknown feature type");
            }
        }
    }

    fn add_all(&mut self, features: Vec<Feature>, owner: &BonusOwner, sub_owner: Option<&BonusOwner>, level: Fxp) {
        for feature in features {
            self.add(feature, owner, sub_owner, level);
        }
    }

    pub fn push_skill_bonus(&mut self, bonus: SkillBonus) {
        self.skill_bonuses.push(bonus);
    }

    pub fn push_spell_bonus(&mut self, bonus: SpellBonus) {
        self.spell_bonuses.push(bonus);
    }
}

fn bonus_owner(id: &Tid, name: &str, replacements: &Replacements) -> BonusOwner {
    BonusOwner::new(id.clone(), name, Arc::new(replacements.clone()))
}

/// Resolves DR bonuses without locations ("this armor") against the other DR
/// bonuses of the same item.
///
/// Each location-less bonus is copied onto the locations of every other DR
/// bonus with the same specialization; the item's remaining locations get
/// one more copy covering all of them. With no located bonus at all it
/// protects [`DrBonus::DEFAULT_LOCATION`].
pub fn expand_dr_bonuses(features: Vec<Feature>) -> Vec<Feature> {
    expand_tagged_dr_bonuses(features.into_iter().map(|f| (f, ())).collect())
        .into_iter()
        .map(|(f, _)| f)
        .collect()
}

/// [`expand_dr_bonuses`] where every feature carries a tag (its sub-owner)
/// that follows it onto its copies.
fn expand_tagged_dr_bonuses<S: Clone>(features: Vec<(Feature, S)>) -> Vec<(Feature, S)> {
    if features
        .iter()
        .all(|(f, _)| !matches!(f, Feature::DrBonus(b) if b.locations.is_empty()))
    {
        return features;
    }
    let located: Vec<&DrBonus> = features
        .iter()
        .filter_map(|(f, _)| match f {
            Feature::DrBonus(b) if !b.locations.is_empty() => Some(b),
            _ => None,
        })
        .collect();

    let all_locations: BTreeSet<&str> = located
        .iter()
        .flat_map(|b| b.locations.iter().map(String::as_str))
        .collect();
    let mut expanded = Vec::new();
    for (feature, tag) in &features {
        let Feature::DrBonus(bonus) = feature else {
            expanded.push((feature.clone(), tag.clone()));
            continue;
        };
        if !bonus.locations.is_empty() {
            expanded.push((feature.clone(), tag.clone()));
            continue;
        }
        if all_locations.is_empty() {
            tracing::debug!(
                location = DrBonus::DEFAULT_LOCATION,
                "DR bonus without locations falls back to the default location"
            );
            let mut copy = bonus.clone();
            copy.locations = vec![DrBonus::DEFAULT_LOCATION.to_string()];
            expanded.push((Feature::DrBonus(copy), tag.clone()));
            continue;
        }
        let mut covered = BTreeSet::new();
        for other in located
            .iter()
            .filter(|o| o.specialization.eq_ignore_ascii_case(&bonus.specialization))
        {
            let mut copy = bonus.clone();
            copy.locations = other.locations.clone();
            covered.extend(other.locations.iter().map(String::as_str));
            expanded.push((Feature::DrBonus(copy), tag.clone()));
        }
        let remaining: Vec<String> = all_locations
            .difference(&covered)
            .map(|l| l.to_string())
            .collect();
        if !remaining.is_empty() {
            let mut copy = bonus.clone();
            copy.locations = remaining;
            expanded.push((Feature::DrBonus(copy), tag.clone()));
        }
    }
    expanded
}

impl Entity {
    /// Rebuilds the feature buckets and everything derived directly from
    /// them: strength variants, attribute bonuses and cost reductions, size
    /// modifier and the dodge/parry/block bonuses.
    pub fn process_features(&mut self) {
        let set = self.collect_features();
        self.features = set;
        self.apply_feature_bonuses();
    }

    fn collect_features(&self) -> FeatureSet {
        let mut set = FeatureSet::default();

        traverse(Visit::ONLY_ENABLED, &self.traits, |node| {
            let t = &node.data;
            let owner = bonus_owner(&node.id, &t.name, &t.replacements);
            if !node.is_container() {
                set.add_all(expand_dr_bonuses(t.features.clone()), &owner, None, t.current_level());
            }
            set.add_all(t.self_control_adj.features(t.self_control_roll), &owner, None, t.current_level());
            traverse(Visit::ENABLED_LEAVES, &t.modifiers, |m| {
                let sub = bonus_owner(&m.id, &m.data.name, &m.data.replacements);
                set.add_all(
                    expand_dr_bonuses(m.data.features.clone()),
                    &owner,
                    Some(&sub),
                    m.data.current_level(),
                );
                false
            });
            false
        });

        traverse(Visit::EXCLUDE_CONTAINERS, &self.skills, |node| {
            let s = &node.data;
            let owner = bonus_owner(&node.id, &s.display_name(), &s.replacements);
            set.add_all(s.features.clone(), &owner, None, s.level.level);
            false
        });

        traverse(Visit::EXCLUDE_CONTAINERS, &self.carried_equipment, |node| {
            let e = &node.data;
            if !e.is_active() {
                return false;
            }
            let owner = bonus_owner(&node.id, &e.name, &e.replacements);
            // DR bonuses of the item and its modifiers form one suit of armor.
            let mut armor: Vec<(Feature, Option<BonusOwner>)> = Vec::new();
            for feature in e.features.iter().cloned() {
                match feature {
                    Feature::DrBonus(_) => armor.push((feature, None)),
                    other => set.add(other, &owner, None, Fxp::ZERO),
                }
            }
            traverse(Visit::ENABLED_LEAVES, &e.modifiers, |m| {
                let sub = bonus_owner(&m.id, &m.data.name, &m.data.replacements);
                for feature in m.data.features.iter().cloned() {
                    match feature {
                        Feature::DrBonus(_) => armor.push((feature, Some(sub.clone()))),
                        other => set.add(other, &owner, Some(&sub), Fxp::ZERO),
                    }
                }
                false
            });
            for (feature, sub) in expand_tagged_dr_bonuses(armor) {
                set.add(feature, &owner, sub.as_ref(), Fxp::ZERO);
            }
            false
        });

        set
    }

    fn apply_feature_bonuses(&mut self) {
        self.derived.lifting_st_bonus = self
            .attribute_bonus_for("st", StrengthLimitation::LiftingOnly, None)
            .trunc();
        self.derived.striking_st_bonus = self
            .attribute_bonus_for("st", StrengthLimitation::StrikingOnly, None)
            .trunc();
        self.derived.throwing_st_bonus = self
            .attribute_bonus_for("st", StrengthLimitation::ThrowingOnly, None)
            .trunc();

        let updates: Vec<(String, Fxp, Fxp)> = self
            .settings
            .attributes
            .iter()
            .map(|def| {
                let mut bonus = self.attribute_bonus_for(&def.id, StrengthLimitation::None, None);
                if !def.is_decimal() {
                    bonus = bonus.trunc();
                }
                (def.id.clone(), bonus, self.cost_reduction_for(&def.id))
            })
            .collect();
        for (id, bonus, reduction) in updates {
            if let Some(attr) = self.attributes.get_mut(&id) {
                attr.bonus = bonus;
                attr.cost_reduction = reduction;
            }
        }

        self.profile.size_modifier_bonus = self
            .attribute_bonus_for("sm", StrengthLimitation::None, None)
            .trunc();

        if self.settings.attributes.get("dodge").is_none() {
            let mut tooltip = String::new();
            self.derived.dodge_bonus = self
                .attribute_bonus_for("dodge", StrengthLimitation::None, Some(&mut tooltip))
                .trunc();
            self.derived.dodge_bonus_tooltip = tooltip;
        } else {
            self.derived.dodge_bonus = Fxp::ZERO;
            self.derived.dodge_bonus_tooltip.clear();
        }

        let mut tooltip = String::new();
        self.derived.parry_bonus = self
            .attribute_bonus_for("parry", StrengthLimitation::None, Some(&mut tooltip))
            .trunc();
        self.derived.parry_bonus_tooltip = tooltip;

        let mut tooltip = String::new();
        self.derived.block_bonus = self
            .attribute_bonus_for("block", StrengthLimitation::None, Some(&mut tooltip))
            .trunc();
        self.derived.block_bonus_tooltip = tooltip;
    }

    /// Reaction bonuses currently in effect, stamped with their owners.
    pub(crate) fn reaction_bonuses(&self) -> &[ReactionBonus] {
        &self.features.reaction_bonuses
    }

    pub(crate) fn conditional_modifier_bonuses(&self) -> &[ConditionalModifierBonus] {
        &self.features.conditional_modifiers
    }
}

/// Total of a set of bonuses, each described in `tooltip`.
pub(crate) fn sum_bonuses<'a, B, I>(bonuses: I, mut tooltip: Option<&mut String>) -> Fxp
where
    B: Bonus + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut total = Fxp::ZERO;
    for bonus in bonuses {
        total += bonus.adjusted_amount();
        bonus.add_to_tooltip(tooltip.as_deref_mut());
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::BonusCore;

    fn dr(amount: i64, locations: &[&str], specialization: &str) -> Feature {
        Feature::DrBonus(DrBonus {
            core: BonusCore::new(Fxp::from_int(amount)),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            specialization: specialization.to_string(),
        })
    }

    fn locations_of(features: &[Feature]) -> Vec<(Vec<String>, i64)> {
        features
            .iter()
            .filter_map(|f| match f {
                Feature::DrBonus(b) => Some((b.locations.clone(), b.core.amount.as_int())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn location_less_dr_follows_the_armor() {
        let features = vec![
            dr(4, &["torso", "groin"], DrBonus::ALL_SPECIALIZATION),
            dr(2, &["arm"], "burning"),
            dr(1, &[], DrBonus::ALL_SPECIALIZATION),
        ];
        let expanded = locations_of(&expand_dr_bonuses(features));
        assert_eq!(
            expanded,
            vec![
                (vec!["torso".to_string(), "groin".to_string()], 4),
                (vec!["arm".to_string()], 2),
                (vec!["torso".to_string(), "groin".to_string()], 1),
                (vec!["arm".to_string()], 1),
            ]
        );
    }

    #[test]
    fn located_bonuses_are_untouched() {
        let features = vec![dr(3, &["skull"], "all")];
        assert_eq!(expand_dr_bonuses(features.clone()), features);
    }

    #[test]
    fn self_control_features_carry_the_trait_level() {
        use crate::ids::TidKind;
        use crate::traits::{SelfControlRoll, SelfControlRollAdj, Trait};
        use crate::tree::Node;

        let mut greed = Trait::leveled("Greed", Fxp::from_int(-5), Fxp::TWO);
        greed.self_control_roll = SelfControlRoll::Cr12;
        greed.self_control_adj = SelfControlRollAdj::MajorCostOfLivingIncrease;
        let mut entity = Entity::default();
        entity.traits.push(Node::new(TidKind::Trait, greed));
        entity.process_features();

        let merchant = &entity.features.skill_bonuses[0];
        assert_eq!(merchant.core.level, Fxp::TWO);
        assert_eq!(merchant.core.amount, Fxp::from_int(-2));
    }

    #[test]
    fn lone_location_less_dr_protects_the_torso() {
        let lonely = vec![dr(3, &[], "all")];
        assert_eq!(locations_of(&expand_dr_bonuses(lonely)), vec![(vec!["torso".to_string()], 3)]);
    }
}
