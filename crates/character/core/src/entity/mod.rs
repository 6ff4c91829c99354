//! The character and its recalculation.
//!
//! [`Entity`] owns the element forests and every piece of derived state. The
//! calculation is split by concern:
//!
//! - [`features`]: per-pass aggregation of feature bonuses
//! - [`lookup`]: bonus queries against the aggregated buckets
//! - [`levels`]: skill and spell levels, defaults and skill editing
//! - [`prereqs`]: prerequisite evaluation
//! - [`points`]: point totals, breakdown and ledger
//! - [`physical`]: lift, encumbrance, move, dodge, damage, wealth and DR
//! - [`reactions`]: reactions and conditional modifiers
//! - [`variables`]: attribute and `$variable` resolution
//! - [`recalc`]: the bounded fixed-point driver

pub mod features;
pub mod levels;
pub mod lookup;
pub mod physical;
pub mod points;
pub mod prereqs;
pub mod reactions;
pub mod recalc;
mod scratch;
pub mod variables;

pub use recalc::{MAX_RECALC_ITERATIONS, RecalcOutcome};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::ancestry::{Ancestry, AncestryLibrary};
use crate::attribute::Attributes;
use crate::config::{GeneralSettings, SheetSettings};
use crate::equipment::Equipment;
use crate::error::DataIntegrityError;
use crate::fxp::Fxp;
use crate::ids::{Tid, TidKind};
use crate::ledger::{self, PointsRecord};
use crate::note::Note;
use crate::owner::{DataOwner, SourceMatcher};
use crate::profile::Profile;
use crate::skill::Skill;
use crate::spell::Spell;
use crate::text::{FormulaResolver, TextResolver};
use crate::traits::{Trait, TraitContainerType};
use crate::tree::{Node, Visit, relink, traverse};
use crate::version::CURRENT_VERSION;
use crate::weight::WeightUnit;

use features::FeatureSet;
use scratch::RecalcScratch;

/// Bonuses derived from features by the last recalculation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedBonuses {
    pub lifting_st_bonus: Fxp,
    pub striking_st_bonus: Fxp,
    pub throwing_st_bonus: Fxp,
    pub dodge_bonus: Fxp,
    pub dodge_bonus_tooltip: String,
    pub parry_bonus: Fxp,
    pub parry_bonus_tooltip: String,
    pub block_bonus: Fxp,
    pub block_bonus_tooltip: String,
}

fn default_resolver() -> Arc<dyn TextResolver> {
    Arc::new(FormulaResolver)
}

/// A character sheet.
///
/// Derived values (levels, bonuses, unsatisfied reasons) are only valid
/// right after [`Entity::recalculate`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Entity {
    pub version: u32,
    pub id: Tid,
    pub total_points: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub points_record: Vec<PointsRecord>,
    pub profile: Profile,
    pub settings: SheetSettings,
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub traits: Vec<Node<Trait>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub skills: Vec<Node<Skill>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub spells: Vec<Node<Spell>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub carried_equipment: Vec<Node<Equipment>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub other_equipment: Vec<Node<Equipment>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub notes: Vec<Node<Note>>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub derived: DerivedBonuses,
    #[cfg_attr(feature = "serde", serde(skip))]
    features: FeatureSet,
    #[cfg_attr(feature = "serde", serde(skip))]
    scratch: RecalcScratch,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_resolver"))]
    resolver: Arc<dyn TextResolver>,
    #[cfg_attr(feature = "serde", serde(skip))]
    source_matcher: SourceMatcher,
}

impl Entity {
    pub fn new(settings: SheetSettings, general: &GeneralSettings) -> Self {
        let now = Utc::now();
        let attributes = Attributes::new(&settings.attributes);
        let mut profile = Profile::new("", general.default_tech_level.clone());
        profile.player_name = general.default_player_name.clone();
        Self {
            version: CURRENT_VERSION,
            id: Tid::new(TidKind::Entity),
            total_points: general.initial_points,
            points_record: vec![PointsRecord::new(
                now,
                general.initial_points,
                PointsRecord::INITIAL_POINTS,
            )],
            profile,
            settings,
            attributes,
            traits: Vec::new(),
            skills: Vec::new(),
            spells: Vec::new(),
            carried_equipment: Vec::new(),
            other_equipment: Vec::new(),
            notes: Vec::new(),
            created_on: now,
            modified_on: now,
            derived: DerivedBonuses::default(),
            features: FeatureSet::default(),
            scratch: RecalcScratch::default(),
            resolver: default_resolver(),
            source_matcher: SourceMatcher::new(),
        }
    }

    /// Brings a freshly deserialized character into a consistent state:
    /// links parents, fills in missing attributes, balances the points
    /// ledger and recalculates.
    pub fn prepare_after_load(&mut self) -> RecalcOutcome {
        self.attributes.sync(&self.settings.attributes);
        ledger::reconcile(&mut self.points_record, self.total_points, Utc::now());
        self.recalculate()
    }

    /// Re-points every parent id, element modifiers included. Idempotent.
    pub fn relink(&mut self) {
        relink(&mut self.traits);
        relink(&mut self.skills);
        relink(&mut self.spells);
        relink(&mut self.carried_equipment);
        relink(&mut self.other_equipment);
        relink(&mut self.notes);
        crate::tree::traverse_mut(Visit::empty(), &mut self.traits, |node| {
            relink(&mut node.data.modifiers);
            false
        });
        for forest in [&mut self.carried_equipment, &mut self.other_equipment] {
            crate::tree::traverse_mut(Visit::empty(), forest, |node| {
                relink(&mut node.data.modifiers);
                false
            });
        }
    }

    pub fn touch(&mut self) {
        self.modified_on = Utc::now();
    }

    pub fn text_resolver(&self) -> &dyn TextResolver {
        self.resolver.as_ref()
    }

    pub fn set_text_resolver(&mut self, resolver: Arc<dyn TextResolver>) {
        self.resolver = resolver;
        self.scratch = RecalcScratch::default();
    }

    pub fn source_matcher_mut(&mut self) -> &mut SourceMatcher {
        &mut self.source_matcher
    }

    /// Expands the embedded expressions of `template` against this character.
    pub fn resolve_text(&self, context: &str, template: &str) -> String {
        self.resolver.resolve_text(Some(self), context, template)
    }

    /// Name of the first enabled ancestry container, if any.
    pub fn ancestry_name(&self) -> Option<&str> {
        let mut found = None;
        traverse(Visit::ONLY_ENABLED, &self.traits, |node| {
            let t = &node.data;
            if node.is_container()
                && t.container_type == TraitContainerType::Ancestry
                && !t.ancestry.is_empty()
            {
                found = Some(t.ancestry.as_str());
                return true;
            }
            false
        });
        found
    }

    /// The character's ancestry, or the default one when it has none.
    pub fn ancestry<'a>(
        &self,
        library: &'a AncestryLibrary,
        general: &GeneralSettings,
    ) -> Result<&'a Ancestry, DataIntegrityError> {
        library.lookup(self.ancestry_name().unwrap_or_default(), &general.default_ancestry)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(SheetSettings::default(), &GeneralSettings::default())
    }
}

impl DataOwner for Entity {
    fn owning_entity(&self) -> Option<&Entity> {
        Some(self)
    }

    fn source_matcher(&self) -> &SourceMatcher {
        &self.source_matcher
    }

    fn weight_unit(&self) -> WeightUnit {
        self.settings.default_weight_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ancestry::Ancestry;

    #[test]
    fn new_entity_starts_with_initial_points_record() {
        let entity = Entity::default();
        assert_eq!(entity.total_points, Fxp::from_int(150));
        assert_eq!(entity.points_record.len(), 1);
        assert_eq!(entity.points_record[0].reason, PointsRecord::INITIAL_POINTS);
        assert_eq!(entity.profile.tech_level, "3");
        assert!(entity.attributes.get("st").is_some());
        assert!(entity.owning_entity().is_some());
    }

    #[test]
    fn entity_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Entity>();
    }

    #[test]
    fn ancestry_comes_from_first_enabled_container() {
        let mut library = AncestryLibrary::new();
        library.insert(Ancestry::new("Human"));
        library.insert(Ancestry::new("Elf"));
        let general = GeneralSettings::default();

        let mut entity = Entity::default();
        assert_eq!(entity.ancestry(&library, &general).map(|a| a.name.as_str()), Ok("Human"));

        let mut disabled = Trait::container("Dwarf", TraitContainerType::Ancestry);
        disabled.ancestry = "Dwarf".into();
        disabled.disabled = true;
        let mut elf = Trait::container("Elf", TraitContainerType::Ancestry);
        elf.ancestry = "Elf".into();
        entity.traits = vec![
            Node::new(TidKind::TraitContainer, disabled),
            Node::new(TidKind::TraitContainer, elf),
        ];
        assert_eq!(entity.ancestry(&library, &general).map(|a| a.name.as_str()), Ok("Elf"));

        let empty = AncestryLibrary::new();
        assert!(entity.ancestry(&empty, &general).is_err());
    }
}
