//! Cost and weight pipelines.
//!
//! Each [`AdjustmentPhase`] starts from the previous phase's result. Within a
//! phase, additions and percentages (of the phase's starting value) are summed
//! and multipliers apply in modifier order.

use crate::feature::Feature;
use crate::fxp::Fxp;
use crate::tree::{Node, Visit, traverse};
use crate::weight::{Weight, WeightUnit};

use super::modifier::{AdjustmentPhase, ModifierValue};
use super::{Equipment, EquipmentModifier};

fn run_phase<F>(start: Fxp, modifiers: &[Node<EquipmentModifier>], mut value_of: F) -> Fxp
where
    F: FnMut(&EquipmentModifier) -> Option<ModifierValue>,
{
    let mut running = start;
    let mut additions = Fxp::ZERO;
    let mut percentages = Fxp::ZERO;
    traverse(Visit::ENABLED_LEAVES, modifiers, |node| {
        match value_of(&node.data) {
            Some(ModifierValue::Addition(amount)) => additions += amount,
            Some(ModifierValue::Percentage(amount)) => percentages += amount,
            Some(ModifierValue::Multiplier(amount)) => running = running * amount,
            None => {}
        }
        false
    });
    running += additions;
    if !percentages.is_zero() {
        running += start * percentages / Fxp::HUNDRED;
    }
    running
}

/// Value of one unit after every enabled modifier, floored at zero.
pub fn value_adjusted_for_modifiers(value: Fxp, modifiers: &[Node<EquipmentModifier>]) -> Fxp {
    AdjustmentPhase::ALL
        .iter()
        .fold(value, |running, phase| {
            run_phase(running, modifiers, |m| {
                (m.cost_phase == *phase && !m.cost.trim().is_empty()).then(|| ModifierValue::parse_cost(&m.cost))
            })
        })
        .max(Fxp::ZERO)
}

/// Weight of one unit after every enabled modifier, floored at zero.
pub fn weight_adjusted_for_modifiers(
    weight: Weight,
    modifiers: &[Node<EquipmentModifier>],
    default_unit: WeightUnit,
) -> Weight {
    let pounds = AdjustmentPhase::ALL.iter().fold(weight.0, |running, phase| {
        run_phase(running, modifiers, |m| {
            (m.weight_phase == *phase && !m.weight.trim().is_empty())
                .then(|| ModifierValue::parse_weight(&m.weight, *phase, default_unit))
        })
    });
    Weight(pounds.max(Fxp::ZERO))
}

/// Value of the item times its quantity, contents included.
pub fn extended_value(node: &Node<Equipment>) -> Fxp {
    let item = &node.data;
    if !item.quantity.is_positive() {
        return Fxp::ZERO;
    }
    let contents: Fxp = node.children.iter().map(extended_value).sum();
    (item.adjusted_value() + contents) * item.quantity
}

/// Weight of the item times its quantity, with contents reduced by any
/// contained weight reduction on the item or its enabled modifiers.
pub fn extended_weight(node: &Node<Equipment>, for_skills: bool, default_unit: WeightUnit) -> Weight {
    let item = &node.data;
    if !item.quantity.is_positive() {
        return Weight::ZERO;
    }
    let mut total = item.adjusted_weight(for_skills, default_unit);
    if !node.children.is_empty() {
        let contained: Weight = node
            .children
            .iter()
            .map(|child| extended_weight(child, for_skills, default_unit))
            .sum();
        let (percentage, fixed) = contained_weight_reduction(item, default_unit);
        let contained = if percentage >= Fxp::HUNDRED {
            Weight::ZERO
        } else if percentage.is_positive() {
            contained - contained.scaled(percentage / Fxp::HUNDRED)
        } else {
            contained
        };
        total += (contained - fixed).max(Weight::ZERO);
    }
    total.scaled(item.quantity)
}

/// Summed percentage and fixed reductions of an item and its modifiers.
fn contained_weight_reduction(item: &Equipment, default_unit: WeightUnit) -> (Fxp, Weight) {
    let mut percentage = Fxp::ZERO;
    let mut fixed = Weight::ZERO;
    let mut collect = |features: &[Feature]| {
        for feature in features {
            if let Feature::ContainedWeightReduction(cwr) = feature {
                if cwr.is_percentage() {
                    percentage += cwr.percentage();
                } else {
                    fixed += cwr.fixed(default_unit);
                }
            }
        }
    };
    collect(&item.features);
    for modifier in item.active_modifiers() {
        collect(&modifier.features);
    }
    (percentage, fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ContainedWeightReduction;
    use crate::ids::TidKind;

    fn modifier(m: EquipmentModifier) -> Node<EquipmentModifier> {
        Node::new(TidKind::EquipmentModifier, m)
    }

    fn item(name: &str, value: i64, lb: i64) -> Node<Equipment> {
        Node::new(TidKind::Equipment, Equipment::new(name, Fxp::from_int(value), Weight::pounds(lb)))
    }

    #[test]
    fn phases_apply_in_order() {
        let mods = vec![
            modifier(EquipmentModifier::new("fine").with_cost(AdjustmentPhase::Final, "x2")),
            modifier(EquipmentModifier::new("extra").with_cost(AdjustmentPhase::Original, "+20")),
            modifier(EquipmentModifier::new("cheap").with_cost(AdjustmentPhase::Base, "-50%")),
        ];
        // (100 + 20) → -50% of 120 = 60 → x2 = 120
        assert_eq!(value_adjusted_for_modifiers(Fxp::HUNDRED, &mods), Fxp::from_int(120));
    }

    #[test]
    fn percentages_use_phase_start_and_multipliers_chain() {
        let mods = vec![
            modifier(EquipmentModifier::new("a").with_cost(AdjustmentPhase::Original, "+10%")),
            modifier(EquipmentModifier::new("b").with_cost(AdjustmentPhase::Original, "+10%")),
            modifier(EquipmentModifier::new("c").with_cost(AdjustmentPhase::FinalBase, "x2")),
            modifier(EquipmentModifier::new("d").with_cost(AdjustmentPhase::FinalBase, "x3")),
        ];
        // 100 + 20% = 120 → x6 = 720
        assert_eq!(value_adjusted_for_modifiers(Fxp::HUNDRED, &mods), Fxp::from_int(720));
    }

    #[test]
    fn disabled_modifiers_and_floor() {
        let mut off = EquipmentModifier::new("off").with_cost(AdjustmentPhase::Original, "+1000");
        off.disabled = true;
        let mods = vec![
            modifier(off),
            modifier(EquipmentModifier::new("neg").with_cost(AdjustmentPhase::Original, "-500")),
        ];
        assert_eq!(value_adjusted_for_modifiers(Fxp::HUNDRED, &mods), Fxp::ZERO);
    }

    #[test]
    fn weight_modifiers_convert_units() {
        let mods = vec![
            modifier(EquipmentModifier::new("plate").with_weight(AdjustmentPhase::Original, "+1 kg")),
            modifier(EquipmentModifier::new("light").with_weight(AdjustmentPhase::Final, "x1/2")),
        ];
        // (10 + 2) / 2
        assert_eq!(
            weight_adjusted_for_modifiers(Weight::pounds(10), &mods, WeightUnit::Pound),
            Weight::pounds(6)
        );
    }

    #[test]
    fn half_weight_container_contributes_half_its_contents() {
        let mut bag = Node::new(TidKind::EquipmentContainer, Equipment::new("Bag of Holding", Fxp::ZERO, Weight::ZERO))
            .with_children(vec![item("Rope", 10, 6), item("Lamp", 5, 4)]);
        bag.data.features = vec![Feature::ContainedWeightReduction(ContainedWeightReduction::new("50%"))];
        assert_eq!(extended_weight(&bag, false, WeightUnit::Pound), Weight::pounds(5));
        assert_eq!(extended_value(&bag), Fxp::from_int(15));
    }

    #[test]
    fn reductions_cap_and_never_go_negative() {
        let mut full = Node::new(TidKind::EquipmentContainer, Equipment::new("Void", Fxp::ZERO, Weight::pounds(1)))
            .with_children(vec![item("Anvil", 0, 100)]);
        full.data.features = vec![
            Feature::ContainedWeightReduction(ContainedWeightReduction::new("80%")),
            Feature::ContainedWeightReduction(ContainedWeightReduction::new("40%")),
        ];
        assert_eq!(extended_weight(&full, false, WeightUnit::Pound), Weight::pounds(1));

        let mut fixed = Node::new(TidKind::EquipmentContainer, Equipment::new("Sack", Fxp::ZERO, Weight::ZERO))
            .with_children(vec![item("Coin", 0, 2)]);
        fixed.data.features = vec![Feature::ContainedWeightReduction(ContainedWeightReduction::new("5 lb"))];
        assert_eq!(extended_weight(&fixed, false, WeightUnit::Pound), Weight::ZERO);
    }

    #[test]
    fn quantity_and_skill_exemption() {
        let mut arrows = item("Arrow", 2, 1);
        arrows.data.quantity = Fxp::from_int(20);
        assert_eq!(extended_weight(&arrows, false, WeightUnit::Pound), Weight::pounds(20));
        assert_eq!(extended_value(&arrows), Fxp::from_int(40));

        arrows.data.weight_ignored_for_skills = true;
        assert_eq!(extended_weight(&arrows, true, WeightUnit::Pound), Weight::ZERO);

        arrows.data.quantity = Fxp::ZERO;
        assert_eq!(extended_value(&arrows), Fxp::ZERO);
    }
}
