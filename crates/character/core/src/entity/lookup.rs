//! Bonus queries against the aggregated features.
//!
//! Every query sums the adjusted amounts of the matching bonuses and, when a
//! tooltip is supplied, appends one line per bonus. Criteria are expanded
//! through the owning element's replacements before matching.

use std::collections::BTreeMap;

use crate::feature::{
    Bonus, DrBonus, SkillBonus, SkillSelection, SpellMatch, StrengthLimitation, WeaponBonus,
    WeaponBonusKind, WeaponSelection,
};
use crate::fxp::Fxp;

use super::Entity;
use super::features::{MAX_COST_REDUCTION, sum_bonuses};

impl Entity {
    pub fn attribute_bonus_for(
        &self,
        attribute: &str,
        limitation: StrengthLimitation,
        tooltip: Option<&mut String>,
    ) -> Fxp {
        sum_bonuses(
            self.features
                .attribute_bonuses
                .iter()
                .filter(|b| b.limitation == limitation && b.attribute.eq_ignore_ascii_case(attribute)),
            tooltip,
        )
    }

    /// Percentage reduction of an attribute's point cost, at most 80%.
    pub fn cost_reduction_for(&self, attribute: &str) -> Fxp {
        self.features
            .cost_reductions
            .iter()
            .filter(|c| c.attribute.eq_ignore_ascii_case(attribute))
            .map(|c| c.percentage)
            .sum::<Fxp>()
            .clamp(Fxp::ZERO, MAX_COST_REDUCTION)
    }

    pub fn skill_bonus_for(
        &self,
        name: &str,
        specialization: &str,
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp {
        sum_bonuses(
            self.features.skill_bonuses.iter().filter(|b| {
                let r = b.replacements();
                b.selection == SkillSelection::SkillsWithName
                    && b.name.matches(r, name)
                    && b.specialization.matches(r, specialization)
                    && b.tags.matches_list(r, tags)
            }),
            tooltip,
        )
    }

    pub fn skill_point_bonus_for(
        &self,
        name: &str,
        specialization: &str,
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp {
        sum_bonuses(
            self.features.skill_point_bonuses.iter().filter(|b| {
                let r = b.replacements();
                b.name.matches(r, name)
                    && b.specialization.matches(r, specialization)
                    && b.tags.matches_list(r, tags)
            }),
            tooltip,
        )
    }

    /// Spell bonuses by spell name, power source and "all colleges", plus
    /// the best single college.
    pub fn spell_bonus_for(
        &self,
        name: &str,
        power_source: &str,
        colleges: &[String],
        tags: &[String],
        mut tooltip: Option<&mut String>,
    ) -> Fxp {
        let level = sum_bonuses(
            self.features.spell_bonuses.iter().filter(|b| {
                let r = b.replacements();
                b.match_kind != SpellMatch::CollegeName
                    && b.match_kind.matches(r, &b.name, name, power_source, colleges)
                    && b.tags.matches_list(r, tags)
            }),
            tooltip.as_deref_mut(),
        );
        level + self.best_college_spell_bonus(colleges, tags, tooltip)
    }

    /// Largest college bonus among `colleges`; zero when none applies.
    pub fn best_college_spell_bonus(
        &self,
        colleges: &[String],
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp {
        let mut best: Option<(Fxp, String)> = None;
        for college in colleges {
            let mut buffer = String::new();
            let points = sum_bonuses(
                self.features.spell_bonuses.iter().filter(|b| {
                    let r = b.replacements();
                    b.match_kind == SpellMatch::CollegeName
                        && b.name.matches(r, college)
                        && b.tags.matches_list(r, tags)
                }),
                Some(&mut buffer),
            );
            if best.as_ref().is_none_or(|(b, _)| points > *b) {
                best = Some((points, buffer));
            }
        }
        match best {
            Some((points, buffer)) => {
                if let Some(tooltip) = tooltip {
                    tooltip.push_str(&buffer);
                }
                points
            }
            None => Fxp::ZERO,
        }
    }

    pub fn spell_point_bonus_for(
        &self,
        name: &str,
        power_source: &str,
        colleges: &[String],
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp {
        sum_bonuses(
            self.features.spell_point_bonuses.iter().filter(|b| {
                let r = b.replacements();
                b.match_kind.matches(r, &b.name, name, power_source, colleges) && b.tags.matches_list(r, tags)
            }),
            tooltip,
        )
    }

    /// Adds the DR bonuses covering `location_id` into `dr`, keyed by
    /// lowercase specialization. "all" locations only cover top-level
    /// body locations.
    pub fn add_dr_bonuses_for(
        &self,
        location_id: &str,
        mut tooltip: Option<&mut String>,
        dr: &mut BTreeMap<String, Fxp>,
    ) {
        let top_level = self
            .settings
            .body_type
            .locations
            .iter()
            .any(|l| l.id.eq_ignore_ascii_case(location_id));
        for bonus in &self.features.dr_bonuses {
            let covers = bonus.locations.iter().any(|l| {
                l.eq_ignore_ascii_case(location_id) || (top_level && l.eq_ignore_ascii_case(DrBonus::ALL_LOCATIONS))
            });
            if covers {
                *dr.entry(bonus.specialization.to_lowercase()).or_insert(Fxp::ZERO) += bonus.adjusted_amount();
                bonus.add_to_tooltip(tooltip.as_deref_mut());
            }
        }
    }

    /// Weapon bonuses of `kinds` that apply to weapons using the named skill
    /// at `relative_level`.
    pub fn weapon_bonuses_with_required_skill(
        &self,
        name: &str,
        specialization: &str,
        relative_level: Fxp,
        tags: &[String],
        kinds: &[WeaponBonusKind],
        mut tooltip: Option<&mut String>,
    ) -> Vec<&WeaponBonus> {
        let matched: Vec<&WeaponBonus> = self
            .features
            .weapon_bonuses
            .iter()
            .filter(|b| {
                let r = b.replacements();
                b.selection == WeaponSelection::WithRequiredSkill
                    && kinds.contains(&b.kind)
                    && b.name.matches(r, name)
                    && b.specialization.matches(r, specialization)
                    && b.relative_level.matches(relative_level)
                    && b.tags.matches_list(r, tags)
            })
            .collect();
        for bonus in &matched {
            bonus.add_to_tooltip(tooltip.as_deref_mut());
        }
        matched
    }

    /// Weapon bonuses of `kinds` that target weapons by name and usage.
    pub fn named_weapon_bonuses_for(
        &self,
        weapon_name: &str,
        usage: &str,
        tags: &[String],
        kinds: &[WeaponBonusKind],
        mut tooltip: Option<&mut String>,
    ) -> Vec<&WeaponBonus> {
        let matched: Vec<&WeaponBonus> = self
            .features
            .weapon_bonuses
            .iter()
            .filter(|b| {
                let r = b.replacements();
                b.selection == WeaponSelection::WithName
                    && kinds.contains(&b.kind)
                    && b.name.matches(r, weapon_name)
                    && b.specialization.matches(r, usage)
                    && b.tags.matches_list(r, tags)
            })
            .collect();
        for bonus in &matched {
            bonus.add_to_tooltip(tooltip.as_deref_mut());
        }
        matched
    }

    /// Skill bonuses that target weapons by name and usage.
    pub fn named_weapon_skill_bonuses_for(
        &self,
        weapon_name: &str,
        usage: &str,
        tags: &[String],
        mut tooltip: Option<&mut String>,
    ) -> Vec<&SkillBonus> {
        let matched: Vec<&SkillBonus> = self
            .features
            .skill_bonuses
            .iter()
            .filter(|b| {
                let r = b.replacements();
                b.selection == SkillSelection::WeaponsWithName
                    && b.name.matches(r, weapon_name)
                    && b.specialization.matches(r, usage)
                    && b.tags.matches_list(r, tags)
            })
            .collect();
        for bonus in &matched {
            bonus.add_to_tooltip(tooltip.as_deref_mut());
        }
        matched
    }
}
