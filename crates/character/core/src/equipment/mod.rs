//! Equipment and equipment modifiers.
//!
//! Cost and weight adjustment lives in [`adjust`]; modifier amount strings
//! are parsed by [`modifier`].

pub mod adjust;
pub mod modifier;

pub use adjust::{
    extended_value, extended_weight, value_adjusted_for_modifiers, weight_adjusted_for_modifiers,
};
pub use modifier::{AdjustmentPhase, ModifierValue};

use crate::feature::Features;
use crate::fxp::Fxp;
use crate::nameable::Replacements;
use crate::prereq::Prereq;
use crate::tree::{Node, NodeData, Visit, traverse};
use crate::weight::{Weight, WeightUnit};

/// Payload of an equipment or equipment container node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Equipment {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tech_level: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub legality_class: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub quantity: Fxp,
    /// Value of a single unit, before modifiers and contents.
    pub value: Fxp,
    /// Weight of a single unit, before modifiers and contents.
    pub weight: Weight,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub weight_ignored_for_skills: bool,
    pub equipped: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub uses: Option<i64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_uses: Option<i64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub modifiers: Vec<Node<EquipmentModifier>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub features: Features,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prereq: Option<Prereq>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub unsatisfied_reason: String,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            name: String::new(),
            tech_level: None,
            legality_class: String::new(),
            tags: Vec::new(),
            notes: String::new(),
            quantity: Fxp::ONE,
            value: Fxp::ZERO,
            weight: Weight::ZERO,
            weight_ignored_for_skills: false,
            equipped: true,
            uses: None,
            max_uses: None,
            modifiers: Vec::new(),
            features: Features::new(),
            prereq: None,
            replacements: Replacements::new(),
            unsatisfied_reason: String::new(),
        }
    }
}

impl Equipment {
    pub fn new(name: impl Into<String>, value: Fxp, weight: Weight) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: Fxp) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Node<EquipmentModifier>>) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the item's features and modifiers take effect.
    pub fn is_active(&self) -> bool {
        self.equipped && self.quantity.is_positive()
    }

    /// Enabled leaf modifiers, in tree order.
    pub fn active_modifiers(&self) -> Vec<&EquipmentModifier> {
        let mut out = Vec::new();
        traverse(Visit::ENABLED_LEAVES, &self.modifiers, |node| {
            out.push(&node.data);
            false
        });
        out
    }

    /// Value of one unit after modifiers, excluding contents.
    pub fn adjusted_value(&self) -> Fxp {
        value_adjusted_for_modifiers(self.value, &self.modifiers)
    }

    /// Weight of one unit after modifiers, excluding contents.
    pub fn adjusted_weight(&self, for_skills: bool, default_unit: WeightUnit) -> Weight {
        if for_skills && self.weight_ignored_for_skills {
            return Weight::ZERO;
        }
        weight_adjusted_for_modifiers(self.weight, &self.modifiers, default_unit)
    }

    pub fn has_tech_level(&self) -> bool {
        self.tech_level.as_deref().is_some_and(|tl| !tl.is_empty())
    }
}

impl NodeData for Equipment {
    fn clear_unused_fields(&mut self, _is_container: bool) {
        for modifier in &mut self.modifiers {
            modifier.clear_unused_fields();
        }
    }
}

/// Payload of an equipment modifier or modifier container node.
///
/// Cost and weight amounts stay textual (`+5`, `-10%`, `x2`, `+1 lb`) and are
/// interpreted per phase by [`ModifierValue`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EquipmentModifier {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tech_level: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub notes: String,
    pub cost_phase: AdjustmentPhase,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub cost: String,
    pub weight_phase: AdjustmentPhase,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub weight: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub disabled: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub features: Features,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,
}

impl EquipmentModifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost(mut self, phase: AdjustmentPhase, amount: impl Into<String>) -> Self {
        self.cost_phase = phase;
        self.cost = amount.into();
        self
    }

    #[must_use]
    pub fn with_weight(mut self, phase: AdjustmentPhase, amount: impl Into<String>) -> Self {
        self.weight_phase = phase;
        self.weight = amount.into();
        self
    }
}

impl NodeData for EquipmentModifier {
    fn enabled(&self) -> bool {
        !self.disabled
    }

    fn clear_unused_fields(&mut self, is_container: bool) {
        if is_container {
            self.cost.clear();
            self.weight.clear();
            self.cost_phase = AdjustmentPhase::default();
            self.weight_phase = AdjustmentPhase::default();
            self.features.clear();
            self.disabled = false;
        }
    }
}
