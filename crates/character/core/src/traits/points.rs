//! Trait point costs.
//!
//! Percentage modifiers are split into enhancement and limitation totals for
//! the base cost and for the per-level cost. How the two totals combine is a
//! sheet-level [`PointPolicy`]; limitations can never take more than 80% off.

use crate::fxp::Fxp;
use crate::tree::{Node, Visit, traverse};

use super::{Affects, ModifierCostType, SelfControlRoll, Trait, TraitContainerType, TraitModifier};

/// Largest reduction limitations may apply, in percent.
const LIMITATION_FLOOR: Fxp = Fxp::from_int(-80);

/// Share of its own value each non-primary alternative ability costs.
const ALTERNATIVE_ABILITY_PERCENT: Fxp = Fxp::TWENTY;

/// How enhancements and limitations combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointPolicy {
    /// Enhancements and limitations are summed, then applied once.
    #[default]
    Additive,
    /// Enhancements apply first, limitations to the enhanced total.
    Multiplicative,
}

impl PointPolicy {
    pub fn from_flag(multiplicative: bool) -> Self {
        if multiplicative {
            Self::Multiplicative
        } else {
            Self::Additive
        }
    }
}

/// `points` adjusted by `modifier` percent.
fn modify_points(points: Fxp, modifier: Fxp) -> Fxp {
    points + modifier_points(points, modifier)
}

/// `modifier` percent of `points`.
pub fn modifier_points(points: Fxp, modifier: Fxp) -> Fxp {
    points * modifier / Fxp::HUNDRED
}

#[derive(Default)]
struct Percentages {
    base_enhancement: Fxp,
    base_limitation: Fxp,
    level_enhancement: Fxp,
    level_limitation: Fxp,
}

impl Percentages {
    fn add(&mut self, modifier: Fxp, affects: Affects) {
        let (base, level) = match affects {
            Affects::Total => (true, true),
            Affects::BaseOnly => (true, false),
            Affects::LevelsOnly => (false, true),
        };
        if modifier.is_positive() {
            if base {
                self.base_enhancement += modifier;
            }
            if level {
                self.level_enhancement += modifier;
            }
        } else if modifier.is_negative() {
            if base {
                self.base_limitation += modifier;
            }
            if level {
                self.level_limitation += modifier;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.base_enhancement.is_zero()
            && self.base_limitation.is_zero()
            && self.level_enhancement.is_zero()
            && self.level_limitation.is_zero()
    }
}

/// Final point cost of a single trait.
///
/// `modifiers` are the enabled leaf modifiers of the trait and of every
/// ancestor container.
pub fn adjusted_points(
    base_points: Fxp,
    levels: Fxp,
    points_per_level: Fxp,
    roll: SelfControlRoll,
    modifiers: &[&TraitModifier],
    round_down: bool,
    policy: PointPolicy,
) -> Fxp {
    let mut base = base_points;
    let mut per_level = points_per_level;
    let mut multiplier = roll.multiplier();
    let mut percentages = Percentages::default();

    for modifier in modifiers {
        let amount = modifier.cost_modifier();
        match modifier.cost_type {
            ModifierCostType::Percentage => percentages.add(amount, modifier.affects),
            ModifierCostType::Points => {
                if modifier.affects == Affects::LevelsOnly {
                    per_level += amount;
                } else {
                    base += amount;
                }
            }
            ModifierCostType::Multiplier => multiplier = multiplier * amount,
        }
    }

    let leveled = per_level * levels;
    let modified = if percentages.is_empty() {
        base + leveled
    } else {
        let p = percentages;
        match policy {
            PointPolicy::Multiplicative => {
                let apply = |points, enhancement, limitation: Fxp| {
                    modify_points(modify_points(points, enhancement), limitation.max(LIMITATION_FLOOR))
                };
                if p.base_enhancement == p.level_enhancement && p.base_limitation == p.level_limitation {
                    apply(base + leveled, p.base_enhancement, p.base_limitation)
                } else {
                    apply(base, p.base_enhancement, p.base_limitation)
                        + apply(leveled, p.level_enhancement, p.level_limitation)
                }
            }
            PointPolicy::Additive => {
                let base_modifier = (p.base_enhancement + p.base_limitation).max(LIMITATION_FLOOR);
                let level_modifier = (p.level_enhancement + p.level_limitation).max(LIMITATION_FLOOR);
                if base_modifier == level_modifier {
                    modify_points(base + leveled, base_modifier)
                } else {
                    modify_points(base, base_modifier) + modify_points(leveled, level_modifier)
                }
            }
        }
    };
    (modified * multiplier).apply_rounding(round_down)
}

/// Point cost of a trait node, including its subtree.
///
/// `inherited` holds the enabled modifiers of the node's ancestors; a disabled
/// node (or one below a disabled ancestor, which callers must not pass in)
/// costs nothing.
pub fn trait_points(node: &Node<Trait>, inherited: &[&TraitModifier], policy: PointPolicy) -> Fxp {
    if !node.enabled() {
        return Fxp::ZERO;
    }
    let t = &node.data;
    let mut modifiers: Vec<&TraitModifier> = inherited.to_vec();
    modifiers.extend(t.active_modifiers());

    if !node.is_container() {
        return adjusted_points(
            t.base_points,
            t.levels,
            t.points_per_level,
            t.self_control_roll,
            &modifiers,
            t.round_cost_down,
            policy,
        );
    }

    let values: Vec<Fxp> = node
        .children
        .iter()
        .map(|child| trait_points(child, &modifiers, policy))
        .collect();
    if t.container_type != TraitContainerType::AlternativeAbilities {
        return values.into_iter().sum();
    }

    // The most expensive ability is paid in full, but never below zero.
    let max = values.iter().copied().fold(Fxp::ZERO, Fxp::max);
    let mut points = max;
    let mut found_max = false;
    for value in values {
        if !found_max && value == max {
            found_max = true;
        } else {
            points += modifier_points(value, ALTERNATIVE_ABILITY_PERCENT).apply_rounding(t.round_cost_down);
        }
    }
    points
}

/// Where a character's points went.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub ancestry: Fxp,
    pub attributes: Fxp,
    pub advantages: Fxp,
    pub disadvantages: Fxp,
    pub quirks: Fxp,
    pub skills: Fxp,
    pub spells: Fxp,
}

impl PointsBreakdown {
    pub fn total(&self) -> Fxp {
        self.ancestry
            + self.attributes
            + self.advantages
            + self.disadvantages
            + self.quirks
            + self.skills
            + self.spells
    }

    /// Routes the cost of an enabled top-level trait node into its bucket.
    pub fn add_trait(&mut self, node: &Node<Trait>, inherited: &[&TraitModifier], policy: PointPolicy) {
        if !node.enabled() {
            return;
        }
        if node.is_container() {
            match node.data.container_type {
                TraitContainerType::Group => {
                    let mut modifiers: Vec<&TraitModifier> = inherited.to_vec();
                    modifiers.extend(node.data.active_modifiers());
                    for child in &node.children {
                        self.add_trait(child, &modifiers, policy);
                    }
                    return;
                }
                TraitContainerType::Ancestry => {
                    self.ancestry += trait_points(node, inherited, policy);
                    return;
                }
                TraitContainerType::Attributes => {
                    self.attributes += trait_points(node, inherited, policy);
                    return;
                }
                TraitContainerType::MetaTrait | TraitContainerType::AlternativeAbilities => {}
            }
        }
        let points = trait_points(node, inherited, policy);
        if points == -Fxp::ONE {
            self.quirks += points;
        } else if points.is_positive() {
            self.advantages += points;
        } else if points.is_negative() {
            self.disadvantages += points;
        }
    }
}

/// Enabled leaf modifiers of every container above a node, outermost first.
pub fn inherited_modifiers<'a>(chain: &[&'a Node<Trait>]) -> Vec<&'a TraitModifier> {
    let mut out = Vec::new();
    for ancestor in chain.iter().rev() {
        traverse(Visit::ENABLED_LEAVES, &ancestor.data.modifiers, |m| {
            out.push(&m.data);
            false
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TidKind;

    fn pct(cost: i64) -> TraitModifier {
        TraitModifier::new("m", Fxp::from_int(cost), ModifierCostType::Percentage)
    }

    fn leaf(points: i64) -> Node<Trait> {
        Node::new(TidKind::Trait, Trait::new("t", Fxp::from_int(points)))
    }

    #[test]
    fn plain_and_leveled_costs() {
        let p = adjusted_points(Fxp::TEN, Fxp::THREE, Fxp::FIVE, SelfControlRoll::None, &[], false, PointPolicy::Additive);
        assert_eq!(p, Fxp::from_int(25));
    }

    #[test]
    fn additive_policy_sums_then_clamps() {
        let enh = pct(50);
        let lim = pct(-100);
        // 50 - 100 = -50% of 20
        let p = adjusted_points(Fxp::from_int(20), Fxp::ZERO, Fxp::ZERO, SelfControlRoll::None, &[&enh, &lim], false, PointPolicy::Additive);
        assert_eq!(p, Fxp::TEN);

        let heavy = pct(-150);
        // clamped at -80% of 20
        let p = adjusted_points(Fxp::from_int(20), Fxp::ZERO, Fxp::ZERO, SelfControlRoll::None, &[&heavy], false, PointPolicy::Additive);
        assert_eq!(p, Fxp::FOUR);
    }

    #[test]
    fn multiplicative_policy_applies_in_sequence() {
        let enh = pct(50);
        let lim = pct(-50);
        // 20 * 1.5 = 30, then -50% = 15
        let p = adjusted_points(
            Fxp::from_int(20),
            Fxp::ZERO,
            Fxp::ZERO,
            SelfControlRoll::None,
            &[&enh, &lim],
            false,
            PointPolicy::Multiplicative,
        );
        assert_eq!(p, Fxp::from_int(15));
    }

    #[test]
    fn base_only_and_levels_only_split() {
        let base_only = pct(100).affecting(Affects::BaseOnly);
        let mut per_level_points = TraitModifier::new("p", Fxp::ONE, ModifierCostType::Points);
        per_level_points.affects = Affects::LevelsOnly;
        // base 10 doubled = 20; levels (2 + 1) * 2 = 6
        let p = adjusted_points(
            Fxp::TEN,
            Fxp::TWO,
            Fxp::TWO,
            SelfControlRoll::None,
            &[&base_only, &per_level_points],
            false,
            PointPolicy::Additive,
        );
        assert_eq!(p, Fxp::from_int(26));
    }

    #[test]
    fn self_control_and_multipliers_compound_then_round() {
        let half = TraitModifier::new("x", Fxp::HALF, ModifierCostType::Multiplier);
        // -15 * 2 (CR6) * 0.5 = -15
        let p = adjusted_points(Fxp::from_int(-15), Fxp::ZERO, Fxp::ZERO, SelfControlRoll::Cr6, &[&half], false, PointPolicy::Additive);
        assert_eq!(p, Fxp::from_int(-15));

        // -5 * 1.5 = -7.5 → ceil -7, floor -8
        let up = adjusted_points(Fxp::from_int(-5), Fxp::ZERO, Fxp::ZERO, SelfControlRoll::Cr9, &[], false, PointPolicy::Additive);
        let down = adjusted_points(Fxp::from_int(-5), Fxp::ZERO, Fxp::ZERO, SelfControlRoll::Cr9, &[], true, PointPolicy::Additive);
        assert_eq!(up, Fxp::from_int(-7));
        assert_eq!(down, Fxp::from_int(-8));
    }

    #[test]
    fn alternative_abilities_pay_a_fifth_for_the_rest() {
        let container = Node::new(
            TidKind::TraitContainer,
            Trait::container("Powers", TraitContainerType::AlternativeAbilities),
        )
        .with_children(vec![leaf(10), leaf(6), leaf(4)]);
        // 10 + ceil(1.2) + ceil(0.8)
        assert_eq!(trait_points(&container, &[], PointPolicy::Additive), Fxp::from_int(13));

        let mut rounded_down = container.clone();
        rounded_down.data.round_cost_down = true;
        // 10 + floor(1.2) + floor(0.8)
        assert_eq!(trait_points(&rounded_down, &[], PointPolicy::Additive), Fxp::from_int(11));
    }

    #[test]
    fn alternative_drawbacks_each_pay_a_fifth() {
        let container = Node::new(
            TidKind::TraitContainer,
            Trait::container("Curses", TraitContainerType::AlternativeAbilities),
        )
        .with_children(vec![leaf(-10), leaf(-5)]);
        // No child beats zero, so both pay 20%: -2 + -1.
        assert_eq!(trait_points(&container, &[], PointPolicy::Additive), Fxp::from_int(-3));

        let empty = Node::new(
            TidKind::TraitContainer,
            Trait::container("Nothing", TraitContainerType::AlternativeAbilities),
        );
        assert_eq!(trait_points(&empty, &[], PointPolicy::Additive), Fxp::ZERO);
    }

    #[test]
    fn container_modifiers_reach_children_and_disabled_costs_nothing() {
        let mut off = leaf(30);
        off.data.disabled = true;
        let group = Node::new(TidKind::TraitContainer, Trait::container("G", TraitContainerType::Group))
            .with_children(vec![leaf(10), off]);
        let mut group = group;
        group.data.modifiers = vec![Node::new(TidKind::TraitModifier, pct(-50))];
        assert_eq!(trait_points(&group, &[], PointPolicy::Additive), Fxp::FIVE);
    }

    #[test]
    fn breakdown_routes_by_container_and_sign() {
        let ancestry = Node::new(TidKind::TraitContainer, Trait::container("Elf", TraitContainerType::Ancestry))
            .with_children(vec![leaf(20)]);
        let group = Node::new(TidKind::TraitContainer, Trait::container("Misc", TraitContainerType::Group))
            .with_children(vec![leaf(15), leaf(-10), leaf(-1)]);
        let mut breakdown = PointsBreakdown::default();
        breakdown.add_trait(&ancestry, &[], PointPolicy::Additive);
        breakdown.add_trait(&group, &[], PointPolicy::Additive);
        assert_eq!(breakdown.ancestry, Fxp::TWENTY);
        assert_eq!(breakdown.advantages, Fxp::from_int(15));
        assert_eq!(breakdown.disadvantages, Fxp::from_int(-10));
        assert_eq!(breakdown.quirks, -Fxp::ONE);
        assert_eq!(breakdown.total(), Fxp::from_int(24));
    }
}
