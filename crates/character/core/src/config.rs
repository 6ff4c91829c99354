//! Sheet and application settings.
//!
//! Settings are passed to the engine by reference; no calculation ever
//! writes to them.

use crate::attribute::AttributeDefs;
use crate::body::BodyType;
use crate::damage::DamageProgression;
use crate::fxp::Fxp;
use crate::weight::WeightUnit;

/// Per-sheet rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SheetSettings {
    pub damage_progression: DamageProgression,
    pub default_weight_unit: WeightUnit,
    /// Trait modifiers combine multiplicatively instead of additively.
    pub use_multiplicative_modifiers: bool,
    /// Attribute-based defaults use half the attribute above 10.
    pub use_half_stat_defaults: bool,
    pub attributes: AttributeDefs,
    pub body_type: BodyType,
}

impl SheetSettings {
    pub const DEFAULT_DAMAGE_PROGRESSION: DamageProgression = DamageProgression::BasicSet;
    pub const DEFAULT_WEIGHT_UNIT: WeightUnit = WeightUnit::Pound;

    pub fn new() -> Self {
        Self {
            damage_progression: Self::DEFAULT_DAMAGE_PROGRESSION,
            default_weight_unit: Self::DEFAULT_WEIGHT_UNIT,
            use_multiplicative_modifiers: false,
            use_half_stat_defaults: false,
            attributes: AttributeDefs::standard(),
            body_type: BodyType::humanoid(),
        }
    }

    pub fn with_damage_progression(mut self, progression: DamageProgression) -> Self {
        self.damage_progression = progression;
        self
    }
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-wide defaults used when creating characters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct GeneralSettings {
    pub initial_points: Fxp,
    pub default_tech_level: String,
    pub default_player_name: String,
    /// Ancestry used when a character has none of its own.
    pub default_ancestry: String,
}

impl GeneralSettings {
    pub const DEFAULT_INITIAL_POINTS: Fxp = Fxp::from_int(150);
    pub const DEFAULT_TECH_LEVEL: &'static str = "3";
    pub const DEFAULT_ANCESTRY: &'static str = "Human";

    pub fn new() -> Self {
        Self {
            initial_points: Self::DEFAULT_INITIAL_POINTS,
            default_tech_level: Self::DEFAULT_TECH_LEVEL.to_string(),
            default_player_name: String::new(),
            default_ancestry: Self::DEFAULT_ANCESTRY.to_string(),
        }
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self::new()
    }
}
