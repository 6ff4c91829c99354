//! Point totals and the points ledger.

use chrono::Utc;

use crate::fxp::Fxp;
use crate::ledger::{self, PointsRecord};
use crate::traits::points::{PointPolicy, PointsBreakdown, trait_points};
use crate::tree::{Visit, traverse};

use super::Entity;

impl Entity {
    fn point_policy(&self) -> PointPolicy {
        PointPolicy::from_flag(self.settings.use_multiplicative_modifiers)
    }

    /// Points spent on attribute adjustments, after cost reductions and the
    /// size-modifier discount.
    pub fn attribute_points(&self) -> Fxp {
        let sm = self.profile.adjusted_size_modifier();
        self.attributes
            .iter()
            .filter_map(|attr| {
                self.settings
                    .attributes
                    .get(&attr.attr_id)
                    .map(|def| attr.point_cost(def, sm))
            })
            .sum()
    }

    /// Points spent on traits, containers included.
    pub fn trait_points(&self) -> Fxp {
        let policy = self.point_policy();
        self.traits
            .iter()
            .map(|node| trait_points(node, &[], policy))
            .sum()
    }

    pub fn skill_points(&self) -> Fxp {
        let mut total = Fxp::ZERO;
        traverse(Visit::EXCLUDE_CONTAINERS, &self.skills, |node| {
            total += node.data.points;
            false
        });
        total
    }

    pub fn spell_points(&self) -> Fxp {
        let mut total = Fxp::ZERO;
        traverse(Visit::EXCLUDE_CONTAINERS, &self.spells, |node| {
            total += node.data.points;
            false
        });
        total
    }

    pub fn spent_points(&self) -> Fxp {
        self.attribute_points() + self.trait_points() + self.skill_points() + self.spell_points()
    }

    pub fn unspent_points(&self) -> Fxp {
        self.total_points - self.spent_points()
    }

    /// Adjusts the total so that `unspent` points remain, recording the
    /// change in the ledger.
    pub fn set_unspent_points(&mut self, unspent: Fxp) {
        let delta = unspent - self.unspent_points();
        if delta.is_zero() {
            return;
        }
        self.total_points += delta;
        self.points_record
            .push(PointsRecord::new(Utc::now(), delta, PointsRecord::UNSPENT_ADJUSTED));
        ledger::sort_newest_first(&mut self.points_record);
        self.touch();
    }

    /// Replaces the ledger; the total becomes the sum of its records.
    pub fn set_points_record(&mut self, mut records: Vec<PointsRecord>) {
        ledger::sort_newest_first(&mut records);
        self.total_points = ledger::total(&records);
        self.points_record = records;
        self.touch();
    }

    /// Adds a reconciliation record if the ledger does not sum to the total.
    pub fn reconcile_points_record(&mut self) -> bool {
        ledger::reconcile(&mut self.points_record, self.total_points, Utc::now())
    }

    /// Spent points by category.
    pub fn points_breakdown(&self) -> PointsBreakdown {
        let policy = self.point_policy();
        let mut breakdown = PointsBreakdown {
            attributes: self.attribute_points(),
            skills: self.skill_points(),
            spells: self.spell_points(),
            ..PointsBreakdown::default()
        };
        for node in &self.traits {
            breakdown.add_trait(node, &[], policy);
        }
        breakdown
    }
}
