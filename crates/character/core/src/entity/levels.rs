//! Skill and spell levels.
//!
//! Regular skills level from their stored best default, so computing one
//! never recurses into another regular skill. Techniques and ritual-magic
//! spells resolve their base skill on demand; the [`Exclusions`] chain
//! they carry keeps that recursion finite.

use std::collections::BTreeSet;

use crate::fxp::Fxp;
use crate::ids::Tid;
use crate::skill::{
    Difficulty, Exclusions, Level, LevelOracle, RitualMagicInput, Skill, SkillDefault,
    SkillLevelInput, SpellLevelInput, TechniqueLevelInput, calculate_ritual_magic_spell_level,
    calculate_skill_level, calculate_spell_level, calculate_technique_level, is_technique,
};
use crate::spell::{Spell, is_ritual_magic};
use crate::tree::{Node, Visit, collect_ids, find, find_mut, traverse};

use super::Entity;

/// Attribute level used for defaults under the rule of 20.
const RULE_OF_20_CAP: Fxp = Fxp::TWENTY;

impl LevelOracle for Entity {
    fn attribute_current(&self, attribute: &str) -> Fxp {
        Entity::attribute_current(self, attribute)
    }

    fn skill_bonus_for(&self, name: &str, specialization: &str, tags: &[String], tooltip: Option<&mut String>) -> Fxp {
        Entity::skill_bonus_for(self, name, specialization, tags, tooltip)
    }

    fn spell_bonus_for(
        &self,
        name: &str,
        power_source: &str,
        colleges: &[String],
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp {
        Entity::spell_bonus_for(self, name, power_source, colleges, tags, tooltip)
    }

    fn encumbrance_penalty(&self) -> Fxp {
        self.encumbrance_level(true).penalty()
    }

    fn default_base_level(&self, default: &SkillDefault, require_points: bool, excludes: &Exclusions) -> Fxp {
        self.default_base(default, require_points, excludes, true)
    }
}

impl Entity {
    /// Skill points after skill point bonuses, never negative.
    pub fn adjusted_skill_points(&self, skill: &Skill, tooltip: Option<&mut String>) -> Fxp {
        let bonus = self.skill_point_bonus_for(&skill.name, &skill.specialization, &skill.tags, tooltip);
        (skill.points + bonus).max(Fxp::ZERO)
    }

    /// Spell points after spell point bonuses, never negative.
    pub fn adjusted_spell_points(&self, spell: &Spell, tooltip: Option<&mut String>) -> Fxp {
        let bonus =
            self.spell_point_bonus_for(&spell.name, &spell.power_source, &spell.colleges, &spell.tags, tooltip);
        (spell.points + bonus).max(Fxp::ZERO)
    }

    /// Skills named `name` (any specialization when `specialization` is
    /// empty), skipping excluded display names. With `require_points`, only
    /// techniques and skills with points qualify.
    pub fn skills_named(
        &self,
        name: &str,
        specialization: &str,
        require_points: bool,
        excludes: &Exclusions,
    ) -> Vec<&Node<Skill>> {
        let mut out = Vec::new();
        traverse(Visit::EXCLUDE_CONTAINERS, &self.skills, |node| {
            let s = &node.data;
            if !excludes.contains(&s.display_name())
                && s.name.eq_ignore_ascii_case(name)
                && (specialization.is_empty() || s.specialization.eq_ignore_ascii_case(specialization))
                && (!require_points || is_technique(node) || self.adjusted_skill_points(s, None).is_positive())
            {
                out.push(node);
            }
            false
        });
        out
    }

    /// The matching skill with the highest level, and that level.
    pub fn best_skill_named(
        &self,
        name: &str,
        specialization: &str,
        require_points: bool,
        excludes: &Exclusions,
    ) -> Option<(&Node<Skill>, Level)> {
        let mut best: Option<(&Node<Skill>, Level)> = None;
        for node in self.skills_named(name, specialization, require_points, excludes) {
            let level = self.skill_level(node, excludes);
            if best.as_ref().is_none_or(|(_, b)| level.level > b.level) {
                best = Some((node, level));
            }
        }
        best
    }

    /// Level of a skill or technique from its current data.
    pub fn skill_level(&self, node: &Node<Skill>, excludes: &Exclusions) -> Level {
        let s = &node.data;
        let points = self.adjusted_skill_points(s, None);
        if is_technique(node) {
            let Some(default) = s.technique_default.as_ref() else {
                return Level::none();
            };
            let excludes = excludes.with(s.display_name());
            return calculate_technique_level(
                self,
                TechniqueLevelInput {
                    name: &s.name,
                    specialization: &s.specialization,
                    tags: &s.tags,
                    default,
                    difficulty: s.difficulty.difficulty,
                    points,
                    require_points: true,
                    limit_modifier: s.technique_limit_modifier,
                    excludes: &excludes,
                },
            );
        }
        calculate_skill_level(
            self,
            SkillLevelInput {
                name: &s.name,
                specialization: &s.specialization,
                tags: &s.tags,
                difficulty: &s.difficulty,
                points,
                encumbrance_multiplier: s.encumbrance_penalty_multiplier,
                default: s.defaulted_from.as_ref(),
            },
        )
    }

    /// Level of the thing `default` names, before its modifier. Parry and
    /// block defaults convert the skill level; attribute defaults honor the
    /// half-stat rule and, with `rule_of_20`, cap the attribute at 20.
    fn default_base(&self, default: &SkillDefault, require_points: bool, excludes: &Exclusions, rule_of_20: bool) -> Fxp {
        let kind = default.default_type.as_str();
        if default.is_skill_based() {
            let Some((_, level)) =
                self.best_skill_named(&default.name, &default.specialization, require_points, excludes)
            else {
                return Fxp::MIN;
            };
            if !level.is_known() {
                return Fxp::MIN;
            }
            return if kind.eq_ignore_ascii_case(SkillDefault::PARRY) {
                (level.level / Fxp::TWO).trunc() + Fxp::THREE + self.derived.parry_bonus
            } else if kind.eq_ignore_ascii_case(SkillDefault::BLOCK) {
                (level.level / Fxp::TWO).trunc() + Fxp::THREE + self.derived.block_bonus
            } else {
                level.level
            };
        }
        let mut level = self.attribute_current(kind);
        if level == Fxp::MIN {
            return level;
        }
        if self.settings.use_half_stat_defaults {
            level = (level / Fxp::TWO).trunc() + Fxp::FIVE;
        }
        if rule_of_20 {
            level = level.min(RULE_OF_20_CAP);
        }
        level
    }

    /// Level `default` provides, modifier included.
    pub fn default_level(&self, default: &SkillDefault, require_points: bool, excludes: &Exclusions, rule_of_20: bool) -> Fxp {
        let base = self.default_base(default, require_points, excludes, rule_of_20);
        if base == Fxp::MIN { base } else { base + default.modifier }
    }

    /// Level a default gives the skill tagged `tags`.
    fn skill_default_level(&self, tags: &[String], default: &SkillDefault, excludes: &Exclusions) -> Fxp {
        let mut level = self.default_level(default, true, excludes, !default.is_skill_based());
        if default.is_skill_based() && level != Fxp::MIN {
            // The base skill's own bonuses would otherwise count twice.
            // Tag-matched bonuses are judged against the defaulting skill.
            if let Some((base, _)) = self.best_skill_named(&default.name, &default.specialization, true, excludes) {
                level -= self.skill_bonus_for(&base.data.name, &base.data.specialization, tags, None);
            }
        }
        level
    }

    /// Defaults with skill-based entries expanded to one per matching skill.
    fn specific_defaults(&self, node: &Node<Skill>) -> Vec<SkillDefault> {
        let excludes = Exclusions::new().with(node.data.display_name());
        let mut out = Vec::new();
        for default in &node.data.defaults {
            if !default.is_skill_based() {
                out.push(default.clone());
                continue;
            }
            for skill in self.skills_named(&default.name, &default.specialization, true, &excludes) {
                let mut specific = default.clone();
                specific.specialization = skill.data.specialization.clone();
                out.push(specific);
            }
        }
        out
    }

    /// Whether following `default` leads back to `node`.
    fn in_default_chain(&self, node: &Node<Skill>, default: Option<&SkillDefault>, looked_at: &mut BTreeSet<Tid>) -> bool {
        let Some(default) = default.filter(|d| d.is_skill_based()) else {
            return false;
        };
        for skill in self.skills_named(&default.name, &default.specialization, true, &Exclusions::new()) {
            if skill.id == node.id {
                return true;
            }
            if looked_at.insert(skill.id.clone())
                && self.in_default_chain(node, skill.data.defaulted_from.as_ref(), looked_at)
            {
                return true;
            }
        }
        false
    }

    /// Highest-level usable default, ignoring `excluded` and any default
    /// whose chain loops back to this skill.
    pub fn best_default(&self, node: &Node<Skill>, excluded: Option<&SkillDefault>) -> Option<SkillDefault> {
        if is_technique(node) || node.data.defaults.is_empty() {
            return None;
        }
        let excludes = Exclusions::new().with(node.data.display_name());
        let mut best: Option<SkillDefault> = None;
        let mut best_level = Fxp::MIN;
        for default in self.specific_defaults(node) {
            if default.equivalent(excluded) || self.in_default_chain(node, Some(&default), &mut BTreeSet::new()) {
                continue;
            }
            let level = self.skill_default_level(&node.data.tags, &default, &excludes);
            if level > best_level {
                let mut chosen = default.without_level_or_points();
                chosen.level = level;
                best = Some(chosen);
                best_level = level;
            }
        }
        best
    }

    /// [`Entity::best_default`] with its adjusted level and the points the
    /// default is worth filled in.
    pub fn best_default_with_points(&self, node: &Node<Skill>, excluded: Option<&SkillDefault>) -> Option<SkillDefault> {
        let mut best = self.best_default(node, excluded)?;
        let s = &node.data;
        let baseline = (self.attribute_current(&s.difficulty.attribute) + s.difficulty.difficulty.base_relative_level()).trunc();
        let level = best.level.trunc();
        best.adjusted_level = level;
        best.points = if level == baseline {
            Fxp::ONE
        } else if level == baseline + Fxp::ONE {
            Fxp::TWO
        } else if level > baseline + Fxp::ONE {
            Fxp::FOUR * (level - (baseline + Fxp::ONE))
        } else {
            -level.max(Fxp::ZERO)
        };
        Some(best)
    }

    /// Recomputes every skill's default and level in tree order. Returns
    /// whether any level changed.
    pub fn update_skills(&mut self) -> bool {
        let mut changed = false;
        for id in collect_ids(Visit::EXCLUDE_CONTAINERS, &self.skills) {
            changed |= self.update_skill(&id);
        }
        changed
    }

    fn update_skill(&mut self, id: &Tid) -> bool {
        let Some(node) = find(&self.skills, id) else {
            return false;
        };
        let defaulted_from = self.best_default_with_points(node, None);
        let mut probe = node.clone();
        probe.data.defaulted_from = defaulted_from;
        let level = self.skill_level(&probe, &Exclusions::new());
        let Some(node) = find_mut(&mut self.skills, id) else {
            return false;
        };
        let changed = node.data.level != level;
        node.data.defaulted_from = probe.data.defaulted_from;
        node.data.level = level;
        changed
    }

    /// Level of a spell or ritual-magic spell from its current data.
    pub fn spell_level(&self, node: &Node<Spell>) -> Level {
        let s = &node.data;
        let points = self.adjusted_spell_points(s, None);
        if is_ritual_magic(node) {
            let base_skill = if s.base_skill.is_empty() { Spell::RITUAL_MAGIC } else { s.base_skill.as_str() };
            let excludes = Exclusions::new().with(s.display_name());
            return calculate_ritual_magic_spell_level(
                self,
                RitualMagicInput {
                    name: &s.name,
                    power_source: &s.power_source,
                    colleges: &s.colleges,
                    tags: &s.tags,
                    difficulty: s.difficulty.difficulty,
                    points,
                    base_skill,
                    prerequisite_count: s.prerequisite_count,
                    excludes: &excludes,
                },
            );
        }
        calculate_spell_level(
            self,
            SpellLevelInput {
                name: &s.name,
                power_source: &s.power_source,
                colleges: &s.colleges,
                tags: &s.tags,
                difficulty: &s.difficulty,
                points,
            },
        )
    }

    /// Recomputes every spell's level. Returns whether any changed.
    pub fn update_spells(&mut self) -> bool {
        let mut changed = false;
        for id in collect_ids(Visit::EXCLUDE_CONTAINERS, &self.spells) {
            let Some(node) = find(&self.spells, &id) else {
                continue;
            };
            let level = self.spell_level(node);
            if let Some(node) = find_mut(&mut self.spells, &id) {
                changed |= node.data.level != level;
                node.data.level = level;
            }
        }
        changed
    }

    fn computed_level(&self, id: &Tid) -> Option<Fxp> {
        find(&self.skills, id).map(|node| self.skill_level(node, &Exclusions::new()).level)
    }

    fn set_skill_points(&mut self, id: &Tid, points: Fxp) {
        if let Some(node) = find_mut(&mut self.skills, id) {
            node.data.points = points;
        }
    }

    fn raw_skill_points(&self, id: &Tid) -> Fxp {
        find(&self.skills, id).map(|n| n.data.points).unwrap_or(Fxp::ZERO)
    }

    fn point_search_span(&self, id: &Tid) -> Fxp {
        let wildcard = find(&self.skills, id).is_some_and(|n| n.data.difficulty.difficulty == Difficulty::Wildcard);
        if wildcard { Fxp::from_int(12) } else { Fxp::FOUR }
    }

    /// Spends the fewest whole points that raise the skill's level.
    pub fn increment_skill_level(&mut self, id: &Tid) {
        if id.is_container() {
            return;
        }
        let Some(old_level) = self.computed_level(id) else {
            return;
        };
        let base = self.raw_skill_points(id).trunc() + Fxp::ONE;
        let max = base + self.point_search_span(id);
        let mut points = base;
        while points < max {
            self.set_skill_points(id, points);
            if self.computed_level(id).is_some_and(|level| level > old_level) {
                break;
            }
            points += Fxp::ONE;
        }
        self.touch();
        self.recalculate();
    }

    /// Removes points until the level drops, then gives back any points the
    /// lower level does not need.
    pub fn decrement_skill_level(&mut self, id: &Tid) {
        if id.is_container() || !self.raw_skill_points(id).is_positive() {
            return;
        }
        let Some(old_level) = self.computed_level(id) else {
            return;
        };
        let base = self.raw_skill_points(id).trunc();
        let min = (base - self.point_search_span(id)).max(Fxp::ZERO);
        let mut points = base;
        while points >= min {
            self.set_skill_points(id, points);
            if self.computed_level(id).is_some_and(|level| level < old_level) {
                break;
            }
            points -= Fxp::ONE;
        }

        if self.raw_skill_points(id).is_positive() {
            let Some(level) = self.computed_level(id) else {
                return;
            };
            while self.raw_skill_points(id).is_positive() {
                let current = self.raw_skill_points(id);
                self.set_skill_points(id, (current - Fxp::ONE).max(Fxp::ZERO));
                if self.computed_level(id) != Some(level) {
                    self.set_skill_points(id, current);
                    break;
                }
            }
        }
        self.touch();
        self.recalculate();
    }

    /// Whether the skill could trade places with the skill it defaults from.
    pub fn can_swap_defaults(&self, id: &Tid) -> bool {
        find(&self.skills, id).is_some_and(|node| {
            !node.is_container()
                && !is_technique(node)
                && self.adjusted_skill_points(&node.data, None).is_positive()
                && node.data.defaulted_from.as_ref().is_some_and(SkillDefault::is_skill_based)
        })
    }

    /// Moves the skill off its current default so that the skill it
    /// defaulted from can default from it instead.
    pub fn swap_defaults(&mut self, id: &Tid) -> bool {
        if !self.can_swap_defaults(id) {
            return false;
        }
        let Some(node) = find(&self.skills, id) else {
            return false;
        };
        let Some(current) = node.data.defaulted_from.clone() else {
            return false;
        };
        let excludes = Exclusions::new().with(node.data.display_name());
        let Some(base_id) = self
            .best_skill_named(&current.name, &current.specialization, true, &excludes)
            .map(|(base, _)| base.id.clone())
        else {
            return false;
        };

        let mut probe = node.clone();
        probe.data.defaulted_from = self.best_default_with_points(node, Some(&current));
        let level = self.skill_level(&probe, &Exclusions::new());
        if let Some(node) = find_mut(&mut self.skills, id) {
            node.data.defaulted_from = probe.data.defaulted_from;
            node.data.level = level;
        }
        self.update_skill(&base_id);
        self.touch();
        true
    }

    /// A technique's base skill must exist and, unless it is itself a
    /// technique, have points in it.
    pub fn technique_satisfied(&self, node: &Node<Skill>, tooltip: &mut String, prefix: &str) -> bool {
        let Some(default) = node.data.technique_default.as_ref().filter(|d| d.is_skill_based()) else {
            return true;
        };
        let excludes = Exclusions::new().with(node.data.display_name());
        match self.best_skill_named(&default.name, &default.specialization, false, &excludes) {
            None => {
                tooltip.push_str(prefix);
                tooltip.push_str("Requires a skill named ");
                tooltip.push_str(&default.full_name());
                false
            }
            Some((base, _)) if !is_technique(base) && !self.adjusted_skill_points(&base.data, None).is_positive() => {
                tooltip.push_str(prefix);
                tooltip.push_str("Requires at least 1 point in the skill named ");
                tooltip.push_str(&default.full_name());
                false
            }
            Some(_) => true,
        }
    }

    /// A ritual-magic spell needs a college and a ritual skill for it, or
    /// the unspecialized ritual skill.
    pub fn ritual_magic_satisfied(&self, node: &Node<Spell>, tooltip: &mut String, prefix: &str) -> bool {
        let s = &node.data;
        if s.colleges.is_empty() {
            tooltip.push_str(prefix);
            tooltip.push_str("Must be assigned to a college");
            return false;
        }
        let base_skill = if s.base_skill.is_empty() { Spell::RITUAL_MAGIC } else { s.base_skill.as_str() };
        let none = Exclusions::new();
        if s.colleges
            .iter()
            .any(|college| self.best_skill_named(base_skill, college, false, &none).is_some())
            || self.best_skill_named(base_skill, "", false, &none).is_some()
        {
            return true;
        }
        tooltip.push_str(prefix);
        tooltip.push_str("Requires a skill named ");
        let options: Vec<String> = s.colleges.iter().map(|c| format!("{base_skill} ({c})")).collect();
        tooltip.push_str(&options.join(" or "));
        false
    }
}
