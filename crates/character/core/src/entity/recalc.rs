//! The recalculation driver.
//!
//! Features depend on skill levels (a skill's per-level bonuses), skill
//! levels depend on features, and prerequisites can add penalties, so one
//! pass is not enough. The driver repeats features, prerequisites and levels
//! until no level changes, giving up after [`MAX_RECALC_ITERATIONS`].

use super::Entity;
use super::scratch::RecalcScratch;

pub const MAX_RECALC_ITERATIONS: usize = 5;

/// How a recalculation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecalcOutcome {
    pub iterations: usize,
    /// `false` when levels were still changing on the last iteration.
    pub converged: bool,
}

impl Entity {
    /// Brings every derived value up to date.
    pub fn recalculate(&mut self) -> RecalcOutcome {
        self.relink();
        self.attributes.sync(&self.settings.attributes);
        self.scratch = RecalcScratch::default();
        self.update_skills();
        self.update_spells();

        let mut outcome = RecalcOutcome {
            iterations: 0,
            converged: false,
        };
        while outcome.iterations < MAX_RECALC_ITERATIONS {
            outcome.iterations += 1;
            self.process_features();
            // Attribute bonuses may have moved; prerequisites must see them.
            self.scratch = RecalcScratch::default();
            self.process_prereqs();
            // Equipment penalties may have changed encumbrance.
            self.scratch = RecalcScratch::default();
            let skills_changed = self.update_skills();
            let spells_changed = self.update_spells();
            if !skills_changed && !spells_changed {
                outcome.converged = true;
                break;
            }
        }

        if outcome.converged {
            tracing::debug!(iterations = outcome.iterations, "recalculated");
        } else {
            tracing::warn!(
                iterations = outcome.iterations,
                entity = %self.id,
                "recalculation did not settle"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{BonusCore, Feature, SkillBonus};
    use crate::fxp::Fxp;
    use crate::ids::TidKind;
    use crate::skill::{AttributeDifficulty, Difficulty, Skill};
    use crate::traits::Trait;
    use crate::tree::Node;

    #[test]
    fn empty_character_settles_at_once() {
        let mut entity = Entity::default();
        let outcome = entity.recalculate();
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn skill_bonus_from_trait_reaches_the_level() {
        let mut entity = Entity::default();
        entity.traits.push(Node::new(
            TidKind::Trait,
            Trait::new("Gifted", Fxp::FIVE).with_features(vec![Feature::SkillBonus(SkillBonus::for_skill(
                "Climbing",
                "",
                BonusCore::new(Fxp::TWO),
            ))]),
        ));
        entity.skills.push(Node::new(
            TidKind::Skill,
            Skill::new("Climbing", AttributeDifficulty::new("dx", Difficulty::Average), Fxp::TWO),
        ));
        let outcome = entity.recalculate();
        assert!(outcome.converged);
        // DX 10, A with 2 points is DX+0, plus 2.
        assert_eq!(entity.skills[0].data.level.level, Fxp::from_int(12));
        assert!(entity.skills[0].data.level.tooltip.contains("Gifted"));
    }
}
