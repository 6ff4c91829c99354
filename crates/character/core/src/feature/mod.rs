//! Features: the effects an element has on its owner.
//!
//! [`Feature`] is a closed sum type; aggregation, hashing and persistence all
//! match on it exhaustively. Bonus variants share a [`BonusCore`] whose owner
//! and level are stamped during aggregation and never persisted.

pub mod bonus;
pub mod criteria;
pub mod kinds;

pub use bonus::{Bonus, BonusCore, BonusOwner};
pub use criteria::{NumericCompare, NumericCriteria, StringCompare, StringCriteria};
pub use kinds::{
    AttributeBonus, ConditionalModifierBonus, ContainedWeightReduction, CostReduction, DrBonus,
    ReactionBonus, SkillBonus, SkillPointBonus, SkillSelection, SpellBonus, SpellMatch,
    SpellPointBonus, StrengthLimitation, WeaponBonus, WeaponBonusKind, WeaponSelection,
};

/// An effect attached to a trait, skill, equipment item or modifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Feature {
    AttributeBonus(AttributeBonus),
    CostReduction(CostReduction),
    DrBonus(DrBonus),
    SkillBonus(SkillBonus),
    SkillPointBonus(SkillPointBonus),
    SpellBonus(SpellBonus),
    SpellPointBonus(SpellPointBonus),
    WeaponBonus(WeaponBonus),
    ReactionBonus(ReactionBonus),
    ConditionalModifier(ConditionalModifierBonus),
    ContainedWeightReduction(ContainedWeightReduction),
    /// A feature type this build does not know; kept so the file still loads.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl Feature {
    /// Stable name of the variant, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AttributeBonus(_) => "attribute_bonus",
            Self::CostReduction(_) => "cost_reduction",
            Self::DrBonus(_) => "dr_bonus",
            Self::SkillBonus(_) => "skill_bonus",
            Self::SkillPointBonus(_) => "skill_point_bonus",
            Self::SpellBonus(_) => "spell_bonus",
            Self::SpellPointBonus(_) => "spell_point_bonus",
            Self::WeaponBonus(_) => "weapon_bonus",
            Self::ReactionBonus(_) => "reaction_bonus",
            Self::ConditionalModifier(_) => "conditional_modifier",
            Self::ContainedWeightReduction(_) => "contained_weight_reduction",
            Self::Unknown => "unknown",
        }
    }

    /// The bonus payload, for variants that carry one.
    pub fn as_bonus(&self) -> Option<&dyn Bonus> {
        match self {
            Self::AttributeBonus(b) => Some(b),
            Self::DrBonus(b) => Some(b),
            Self::SkillBonus(b) => Some(b),
            Self::SkillPointBonus(b) => Some(b),
            Self::SpellBonus(b) => Some(b),
            Self::SpellPointBonus(b) => Some(b),
            Self::WeaponBonus(b) => Some(b),
            Self::ReactionBonus(b) => Some(b),
            Self::ConditionalModifier(b) => Some(b),
            Self::CostReduction(_) | Self::ContainedWeightReduction(_) | Self::Unknown => None,
        }
    }

    pub fn as_bonus_mut(&mut self) -> Option<&mut dyn Bonus> {
        match self {
            Self::AttributeBonus(b) => Some(b),
            Self::DrBonus(b) => Some(b),
            Self::SkillBonus(b) => Some(b),
            Self::SkillPointBonus(b) => Some(b),
            Self::SpellBonus(b) => Some(b),
            Self::SpellPointBonus(b) => Some(b),
            Self::WeaponBonus(b) => Some(b),
            Self::ReactionBonus(b) => Some(b),
            Self::ConditionalModifier(b) => Some(b),
            Self::CostReduction(_) | Self::ContainedWeightReduction(_) | Self::Unknown => None,
        }
    }

    /// Stamps owner, sub-owner and leveling factor onto a bonus variant.
    pub fn stamp(&mut self, owner: BonusOwner, sub_owner: Option<BonusOwner>, level: crate::Fxp) {
        if let Some(bonus) = self.as_bonus_mut() {
            let core = bonus.core_mut();
            core.owner = Some(owner);
            core.sub_owner = sub_owner;
            core.level = level;
        }
    }

    /// Forgets everything stamped by [`Feature::stamp`].
    pub fn clear_transient(&mut self) {
        if let Some(bonus) = self.as_bonus_mut() {
            bonus.core_mut().clear_transient();
        }
    }
}

/// Ordered feature list carried by an element.
pub type Features = Vec<Feature>;

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn unknown_feature_types_decode_as_unknown() {
        let features: Features = serde_json::from_str(
            r#"[
                {"type": "attribute_bonus", "attribute": "st", "amount": 2},
                {"type": "teleport_bonus", "amount": 5}
            ]"#,
        )
        .unwrap();
        assert_eq!(features.len(), 2);
        assert!(matches!(&features[0], Feature::AttributeBonus(b) if b.attribute == "st"));
        assert_eq!(features[1], Feature::Unknown);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Fxp;
    use crate::ids::{Tid, TidKind};

    #[test]
    fn stamping_sets_level_and_owner_only_on_bonuses() {
        let mut bonus = Feature::AttributeBonus(AttributeBonus::new("st", BonusCore::per_level(Fxp::ONE)));
        let owner = BonusOwner::new(Tid::new(TidKind::Trait), "Strong", Arc::default());
        bonus.stamp(owner, None, Fxp::THREE);
        assert_eq!(bonus.as_bonus().map(|b| b.adjusted_amount()), Some(Fxp::THREE));

        bonus.clear_transient();
        assert_eq!(bonus.as_bonus().map(|b| b.adjusted_amount()), Some(Fxp::ZERO));

        let mut reduction = Feature::ContainedWeightReduction(ContainedWeightReduction::new("10%"));
        let owner = BonusOwner::new(Tid::new(TidKind::Equipment), "Pack", Arc::default());
        reduction.stamp(owner, None, Fxp::ONE);
        assert!(reduction.as_bonus().is_none());
    }
}
