//! Character-sheet calculation engine.
//!
//! `character-core` holds the element types of a GURPS character (traits,
//! skills, spells, equipment, notes), the feature and prerequisite models
//! that tie them together, and the calculators that turn the stored choices
//! into levels, point totals and derived values. [`Entity::recalculate`]
//! drives every computation; the rest of the crate is data plus pure
//! functions over it.
pub mod ancestry;
pub mod attribute;
pub mod body;
pub mod config;
pub mod damage;
pub mod encumbrance;
pub mod entity;
pub mod equipment;
pub mod error;
pub mod feature;
pub mod fxp;
#[cfg(feature = "serde")]
pub mod hash;
pub mod ids;
pub mod ledger;
pub mod nameable;
pub mod note;
pub mod owner;
pub mod prereq;
pub mod profile;
pub mod reaction;
pub mod skill;
pub mod spell;
pub mod template;
pub mod text;
pub mod traits;
pub mod tree;
pub mod version;
pub mod weight;

pub use ancestry::{Ancestry, AncestryLibrary};
pub use attribute::{Attribute, AttributeDef, AttributeDefs, AttributeKind, Attributes};
pub use body::{BodyType, HitLocation};
pub use config::{GeneralSettings, SheetSettings};
pub use damage::{DamageProgression, Dice};
pub use encumbrance::Encumbrance;
pub use entity::{Entity, MAX_RECALC_ITERATIONS, RecalcOutcome};
pub use equipment::{Equipment, EquipmentModifier};
pub use error::{DataIntegrityError, ErrorSeverity, SheetError, VersionError};
pub use feature::{Bonus, BonusCore, Feature, Features};
pub use fxp::Fxp;
#[cfg(feature = "serde")]
pub use hash::{SourceDigest, SourceHash};
pub use ids::{Tid, TidKind};
pub use ledger::PointsRecord;
pub use note::Note;
pub use owner::{DataOwner, SourceMatcher};
pub use prereq::Prereq;
pub use profile::Profile;
pub use reaction::ConditionalModifier;
pub use skill::{Difficulty, Skill, SkillDefault};
pub use spell::Spell;
pub use template::Template;
pub use text::{FormulaResolver, TextResolver, VariableResolver};
pub use traits::{Trait, TraitContainerType, TraitModifier};
pub use tree::{Node, NodeData, Visit};
pub use version::{CURRENT_VERSION, MINIMUM_VERSION, check_version};
pub use weight::{Weight, WeightUnit};
