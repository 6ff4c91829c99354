//! Traits (advantages, disadvantages, perks and quirks) and their modifiers.

pub mod points;

pub use points::{
    PointPolicy, PointsBreakdown, adjusted_points, inherited_modifiers, modifier_points, trait_points,
};

use crate::feature::{BonusCore, Feature, Features, SkillBonus};
use crate::fxp::Fxp;
use crate::nameable::Replacements;
use crate::prereq::Prereq;
use crate::tree::{Node, NodeData, Visit, traverse};

macro_rules! trait_enum {
    ($(#[$meta:meta])* $name:ident { #[default] $default:ident, $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
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
        pub enum $name {
            #[default]
            $default,
            $($variant),*
        }
    };
}

trait_enum! {
    /// How often a disadvantage with self-control takes hold.
    SelfControlRoll {
        #[default] None,
        Cr6,
        Cr9,
        Cr12,
        Cr15,
    }
}

impl SelfControlRoll {
    /// Point cost multiplier of the roll.
    pub fn multiplier(self) -> Fxp {
        match self {
            Self::None | Self::Cr12 => Fxp::ONE,
            Self::Cr6 => Fxp::TWO,
            Self::Cr9 => Fxp::from_ratio(3, 2),
            Self::Cr15 => Fxp::HALF,
        }
    }

    /// Position among the real rolls, `None` for no roll.
    pub fn index(self) -> Option<i64> {
        match self {
            Self::None => None,
            Self::Cr6 => Some(0),
            Self::Cr9 => Some(1),
            Self::Cr12 => Some(2),
            Self::Cr15 => Some(3),
        }
    }

    pub fn target(self) -> Option<i64> {
        match self {
            Self::None => None,
            Self::Cr6 => Some(6),
            Self::Cr9 => Some(9),
            Self::Cr12 => Some(12),
            Self::Cr15 => Some(15),
        }
    }
}

trait_enum! {
    /// Extra consequence attached to a self-control roll.
    SelfControlRollAdj {
        #[default] None,
        ActionPenalty,
        ReactionPenalty,
        FrightCheckPenalty,
        FrightCheckBonus,
        MinorCostOfLivingIncrease,
        MajorCostOfLivingIncrease,
    }
}

impl SelfControlRollAdj {
    /// Signed adjustment for `roll`; zero when either side is absent.
    pub fn adjustment(self, roll: SelfControlRoll) -> Fxp {
        let Some(index) = roll.index() else {
            return Fxp::ZERO;
        };
        match self {
            Self::None => Fxp::ZERO,
            Self::ActionPenalty
            | Self::ReactionPenalty
            | Self::FrightCheckPenalty
            | Self::MajorCostOfLivingIncrease => Fxp::from_int(index - 4),
            Self::FrightCheckBonus => Fxp::from_int(4 - index),
            Self::MinorCostOfLivingIncrease => Fxp::from_int(5 * (4 - index)),
        }
    }

    pub fn describe(self, roll: SelfControlRoll) -> String {
        let amount = self.adjustment(roll);
        match self {
            Self::None => String::new(),
            Self::ActionPenalty => format!("{} to actions when the roll is failed", amount.string_with_sign()),
            Self::ReactionPenalty => format!("{} to reactions when the roll is failed", amount.string_with_sign()),
            Self::FrightCheckPenalty => format!("{} to fright checks", amount.string_with_sign()),
            Self::FrightCheckBonus => format!("{} to fright checks", amount.string_with_sign()),
            Self::MinorCostOfLivingIncrease => format!("+{}% cost of living", amount),
            Self::MajorCostOfLivingIncrease => format!("{} to Merchant skill", amount.string_with_sign()),
        }
    }

    /// Features implied by the adjustment. Only the major cost-of-living
    /// increase has one: a penalty to Merchant.
    pub fn features(self, roll: SelfControlRoll) -> Features {
        if self != Self::MajorCostOfLivingIncrease || roll == SelfControlRoll::None {
            return Features::new();
        }
        vec![Feature::SkillBonus(SkillBonus::for_skill(
            "Merchant",
            "",
            BonusCore::new(self.adjustment(roll)),
        ))]
    }
}

trait_enum! {
    /// How a trait container prices and reports its children.
    TraitContainerType {
        #[default] Group,
        MetaTrait,
        Ancestry,
        AlternativeAbilities,
        Attributes,
    }
}

trait_enum! {
    /// What a trait modifier's cost is expressed in.
    ModifierCostType {
        #[default] Percentage,
        Points,
        Multiplier,
    }
}

trait_enum! {
    /// Which part of a leveled trait a modifier applies to.
    Affects {
        #[default] Total,
        BaseOnly,
        LevelsOnly,
    }
}

/// Payload of a trait or trait container node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Trait {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub base_points: Fxp,
    pub levels: Fxp,
    pub points_per_level: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub disabled: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub round_cost_down: bool,
    #[cfg_attr(feature = "serde", serde(rename = "cr"))]
    pub self_control_roll: SelfControlRoll,
    #[cfg_attr(feature = "serde", serde(rename = "cr_adj"))]
    pub self_control_adj: SelfControlRollAdj,
    pub container_type: TraitContainerType,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub ancestry: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub modifiers: Vec<Node<TraitModifier>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub features: Features,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prereq: Option<Prereq>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub unsatisfied_reason: String,
}

impl Trait {
    pub fn new(name: impl Into<String>, base_points: Fxp) -> Self {
        Self {
            name: name.into(),
            base_points,
            ..Self::default()
        }
    }

    /// A trait bought in levels.
    pub fn leveled(name: impl Into<String>, points_per_level: Fxp, levels: Fxp) -> Self {
        Self {
            name: name.into(),
            points_per_level,
            levels,
            ..Self::default()
        }
    }

    pub fn container(name: impl Into<String>, container_type: TraitContainerType) -> Self {
        Self {
            name: name.into(),
            container_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Node<TraitModifier>>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_leveled(&self) -> bool {
        !self.points_per_level.is_zero()
    }

    /// Leveling factor handed to the trait's per-level bonuses.
    pub fn current_level(&self) -> Fxp {
        if self.is_leveled() {
            self.levels.max(Fxp::ZERO)
        } else {
            Fxp::ZERO
        }
    }

    /// Enabled leaf modifiers of this trait, in tree order.
    pub fn active_modifiers(&self) -> Vec<&TraitModifier> {
        let mut out = Vec::new();
        traverse(Visit::ENABLED_LEAVES, &self.modifiers, |node| {
            out.push(&node.data);
            false
        });
        out
    }

    /// Enabled leaf modifier named `name`, if any.
    pub fn active_modifier_for(&self, name: &str) -> Option<&TraitModifier> {
        self.active_modifiers().into_iter().find(|m| m.name == name)
    }

    /// Feature list plus the features implied by the self-control roll.
    pub fn all_features(&self) -> Features {
        let mut features = self.features.clone();
        features.extend(self.self_control_adj.features(self.self_control_roll));
        features
    }
}

impl NodeData for Trait {
    fn enabled(&self) -> bool {
        !self.disabled
    }

    fn clear_unused_fields(&mut self, is_container: bool) {
        if is_container {
            self.base_points = Fxp::ZERO;
            self.levels = Fxp::ZERO;
            self.points_per_level = Fxp::ZERO;
            self.prereq = None;
        } else {
            self.container_type = TraitContainerType::default();
            self.ancestry.clear();
        }
        for modifier in &mut self.modifiers {
            modifier.clear_unused_fields();
        }
    }
}

/// Payload of a trait modifier or trait modifier container node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct TraitModifier {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub cost: Fxp,
    pub levels: Fxp,
    pub cost_type: ModifierCostType,
    pub affects: Affects,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub disabled: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub features: Features,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,
}

impl TraitModifier {
    pub fn new(name: impl Into<String>, cost: Fxp, cost_type: ModifierCostType) -> Self {
        Self {
            name: name.into(),
            cost,
            cost_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn affecting(mut self, affects: Affects) -> Self {
        self.affects = affects;
        self
    }

    pub fn has_levels(&self) -> bool {
        self.cost_type == ModifierCostType::Percentage && self.levels.is_positive()
    }

    /// Cost scaled by levels when the modifier is leveled.
    pub fn cost_modifier(&self) -> Fxp {
        if self.levels.is_positive() {
            self.cost * self.levels
        } else {
            self.cost
        }
    }

    pub fn current_level(&self) -> Fxp {
        if self.levels.is_positive() { self.levels } else { Fxp::ZERO }
    }

    pub fn cost_description(&self) -> String {
        match self.cost_type {
            ModifierCostType::Percentage => format!("{}%", self.cost_modifier().string_with_sign()),
            ModifierCostType::Points => self.cost_modifier().string_with_sign(),
            ModifierCostType::Multiplier => format!("×{}", self.cost_modifier()),
        }
    }
}

impl NodeData for TraitModifier {
    fn enabled(&self) -> bool {
        !self.disabled
    }

    fn clear_unused_fields(&mut self, is_container: bool) {
        if is_container {
            self.cost = Fxp::ZERO;
            self.levels = Fxp::ZERO;
            self.cost_type = ModifierCostType::default();
            self.affects = Affects::default();
            self.features.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TidKind;

    #[test]
    fn self_control_multipliers() {
        assert_eq!(SelfControlRoll::Cr6.multiplier(), Fxp::TWO);
        assert_eq!(SelfControlRoll::Cr9.multiplier(), Fxp::from_ratio(3, 2));
        assert_eq!(SelfControlRoll::Cr12.multiplier(), Fxp::ONE);
        assert_eq!(SelfControlRoll::Cr15.multiplier(), Fxp::HALF);
        assert_eq!(SelfControlRoll::None.multiplier(), Fxp::ONE);
    }

    #[test]
    fn major_cost_of_living_penalizes_merchant() {
        let adj = SelfControlRollAdj::MajorCostOfLivingIncrease;
        let features = adj.features(SelfControlRoll::Cr9);
        assert_eq!(features.len(), 1);
        match &features[0] {
            Feature::SkillBonus(bonus) => {
                assert_eq!(bonus.core.amount, Fxp::from_int(-3));
                assert_eq!(bonus.name.qualifier, "Merchant");
            }
            other => panic!("unexpected feature {other:?}"),
        }
        assert!(adj.features(SelfControlRoll::None).is_empty());
        assert!(SelfControlRollAdj::ActionPenalty.features(SelfControlRoll::Cr6).is_empty());
    }

    #[test]
    fn adjustments_scale_with_roll() {
        assert_eq!(
            SelfControlRollAdj::ReactionPenalty.adjustment(SelfControlRoll::Cr6),
            Fxp::from_int(-4)
        );
        assert_eq!(
            SelfControlRollAdj::FrightCheckBonus.adjustment(SelfControlRoll::Cr15),
            Fxp::ONE
        );
        assert_eq!(
            SelfControlRollAdj::ActionPenalty.adjustment(SelfControlRoll::None),
            Fxp::ZERO
        );
    }

    #[test]
    fn active_modifiers_skip_disabled_and_containers() {
        let mut off = TraitModifier::new("Off", Fxp::TEN, ModifierCostType::Percentage);
        off.disabled = true;
        let group = Node::new(
            TidKind::TraitModifierContainer,
            TraitModifier::new("Group", Fxp::ZERO, ModifierCostType::Percentage),
        )
        .with_children(vec![Node::new(
            TidKind::TraitModifier,
            TraitModifier::new("Nested", Fxp::from_int(-10), ModifierCostType::Percentage),
        )]);
        let t = Trait::new("Flight", Fxp::from_int(40)).with_modifiers(vec![
            Node::new(TidKind::TraitModifier, off),
            group,
        ]);
        let names: Vec<&str> = t.active_modifiers().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Nested"]);
        assert!(t.active_modifier_for("Off").is_none());
    }

    #[test]
    fn leveled_cost_modifier() {
        let mut m = TraitModifier::new("Increased Range", Fxp::TEN, ModifierCostType::Percentage);
        m.levels = Fxp::THREE;
        assert_eq!(m.cost_modifier(), Fxp::from_int(30));
        assert_eq!(m.current_level(), Fxp::THREE);
        assert_eq!(m.cost_description(), "+30%");
    }
}
