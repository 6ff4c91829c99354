//! Strength-derived values, encumbrance, movement, wealth and DR.

use std::collections::BTreeMap;

use crate::damage::{Dice, lift};
use crate::encumbrance::Encumbrance;
use crate::equipment::{extended_value, extended_weight};
use crate::feature::DrBonus;
use crate::fxp::Fxp;
use crate::weight::Weight;

use super::Entity;

const STRENGTH: &str = "st";
const BASIC_MOVE: &str = "basic_move";
const BASIC_SPEED: &str = "basic_speed";

impl Entity {
    fn strength(&self) -> Fxp {
        self.attribute_current(STRENGTH).max(Fxp::ZERO)
    }

    pub fn lifting_strength(&self) -> Fxp {
        (self.strength() + self.derived.lifting_st_bonus).trunc()
    }

    pub fn striking_strength(&self) -> Fxp {
        (self.strength() + self.derived.striking_st_bonus).trunc()
    }

    pub fn throwing_strength(&self) -> Fxp {
        (self.strength() + self.derived.throwing_st_bonus).trunc()
    }

    pub fn basic_lift(&self) -> Weight {
        if let Some(lift) = self.scratch.basic_lift.get() {
            return lift;
        }
        let lift = self.settings.damage_progression.basic_lift(self.lifting_strength());
        self.scratch.basic_lift.set(Some(lift));
        lift
    }

    pub fn one_handed_lift(&self) -> Weight {
        self.basic_lift().scaled(lift::ONE_HANDED)
    }

    pub fn two_handed_lift(&self) -> Weight {
        self.basic_lift().scaled(lift::TWO_HANDED)
    }

    pub fn shove_and_knock_over(&self) -> Weight {
        self.basic_lift().scaled(lift::SHOVE_AND_KNOCK_OVER)
    }

    pub fn running_shove_and_knock_over(&self) -> Weight {
        self.basic_lift().scaled(lift::RUNNING_SHOVE)
    }

    pub fn carry_on_back(&self) -> Weight {
        self.basic_lift().scaled(lift::CARRY_ON_BACK)
    }

    pub fn shift_slightly(&self) -> Weight {
        self.basic_lift().scaled(lift::SHIFT_SLIGHTLY)
    }

    /// Heaviest load that still counts as `encumbrance`.
    pub fn maximum_carry(&self, encumbrance: Encumbrance) -> Weight {
        self.basic_lift().scaled(encumbrance.weight_multiplier())
    }

    /// Total weight of carried equipment. With `for_skills`, modifiers that
    /// only matter for skill encumbrance are honored.
    pub fn weight_carried(&self, for_skills: bool) -> Weight {
        let unit = self.settings.default_weight_unit;
        self.carried_equipment
            .iter()
            .map(|node| extended_weight(node, for_skills, unit))
            .sum()
    }

    pub fn encumbrance_level(&self, for_skills: bool) -> Encumbrance {
        let slot = self.scratch.encumbrance_slot(for_skills);
        if let Some(level) = slot.get() {
            return level;
        }
        let carried = self.weight_carried(for_skills);
        let level = Encumbrance::ALL
            .into_iter()
            .find(|level| carried <= self.maximum_carry(*level))
            .unwrap_or(Encumbrance::ExtraHeavy);
        slot.set(Some(level));
        level
    }

    pub fn basic_move(&self) -> Fxp {
        self.attribute_current(BASIC_MOVE).max(Fxp::ZERO)
    }

    pub fn basic_speed(&self) -> Fxp {
        self.attribute_current(BASIC_SPEED).max(Fxp::ZERO)
    }

    pub fn move_for(&self, encumbrance: Encumbrance) -> Fxp {
        encumbrance.move_for(self.basic_move())
    }

    pub fn dodge(&self, encumbrance: Encumbrance) -> Fxp {
        encumbrance.dodge_for(self.basic_speed(), self.derived.dodge_bonus)
    }

    pub fn thrust(&self) -> Dice {
        self.settings.damage_progression.thrust(self.striking_strength().as_int())
    }

    pub fn swing(&self) -> Dice {
        self.settings.damage_progression.swing(self.striking_strength().as_int())
    }

    pub fn wealth_carried(&self) -> Fxp {
        self.carried_equipment.iter().map(extended_value).sum()
    }

    pub fn wealth_not_carried(&self) -> Fxp {
        self.other_equipment.iter().map(extended_value).sum()
    }

    /// DR at a hit location by specialization. Natural DR of the location
    /// and the locations above it counts as "all"; "all" is then added into
    /// every other specialization.
    pub fn dr_for(&self, location_id: &str, mut tooltip: Option<&mut String>) -> BTreeMap<String, Fxp> {
        let mut dr = BTreeMap::new();
        if let Some(chain) = self.settings.body_type.lookup(location_id) {
            let natural: Fxp = chain.iter().map(|l| l.dr_bonus).sum();
            if !natural.is_zero() {
                dr.insert(DrBonus::ALL_SPECIALIZATION.to_string(), natural);
                if let Some(tooltip) = tooltip.as_deref_mut() {
                    tooltip.push_str(&format!("\nBody [{}]", natural.string_with_sign()));
                }
            }
        }
        self.add_dr_bonuses_for(location_id, tooltip, &mut dr);
        if let Some(all) = dr.get(DrBonus::ALL_SPECIALIZATION).copied() {
            for (key, value) in dr.iter_mut() {
                if key != DrBonus::ALL_SPECIALIZATION {
                    *value += all;
                }
            }
        }
        dr
    }
}
