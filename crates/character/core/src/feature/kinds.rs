//! Concrete feature payloads.

use crate::fxp::Fxp;
use crate::weight::{Weight, WeightUnit};

use super::bonus::{Bonus, BonusCore, impl_bonus};
use super::criteria::{NumericCriteria, StringCriteria};

macro_rules! closed_enum {
    ($(#[$meta:meta])* $name:ident { $(#[default] $default:ident,)? $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            PartialEq,
            Eq,
            Hash,
            strum::Display,
            strum::EnumString,
            strum::AsRefStr,
            strum::EnumIter,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(rename_all = "snake_case")
        )]
        #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
        pub enum $name {
            $(#[default] $default,)?
            $($variant),*
        }
    };
}

closed_enum! {
    /// Restricts a strength bonus to one use of ST.
    StrengthLimitation {
        #[default] None,
        StrikingOnly,
        LiftingOnly,
        ThrowingOnly,
    }
}

/// Bonus to an attribute (or to `dodge`/`parry`/`block`/`sm`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AttributeBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub attribute: String,
    pub limitation: StrengthLimitation,
}

impl AttributeBonus {
    pub fn new(attribute: impl Into<String>, core: BonusCore) -> Self {
        Self {
            core,
            attribute: attribute.into(),
            limitation: StrengthLimitation::None,
        }
    }

    #[must_use]
    pub fn with_limitation(mut self, limitation: StrengthLimitation) -> Self {
        self.limitation = limitation;
        self
    }
}

/// Percentage reduction of an attribute's point cost.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct CostReduction {
    pub attribute: String,
    pub percentage: Fxp,
}

/// Damage resistance bonus for hit locations.
///
/// An empty `locations` list means "wherever this armor already protects";
/// aggregation expands it against the item's other DR bonuses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DrBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub locations: Vec<String>,
    pub specialization: String,
}

impl DrBonus {
    /// Specialization covering every kind of damage.
    pub const ALL_SPECIALIZATION: &'static str = "all";
    /// Location sentinel meaning every top-level location.
    pub const ALL_LOCATIONS: &'static str = "all";
    /// Where a DR bonus with no locations and no sibling to follow applies.
    pub const DEFAULT_LOCATION: &'static str = "torso";
}

impl Default for DrBonus {
    fn default() -> Self {
        Self {
            core: BonusCore::default(),
            locations: Vec::new(),
            specialization: Self::ALL_SPECIALIZATION.to_string(),
        }
    }
}

closed_enum! {
    /// What a [`SkillBonus`] targets.
    SkillSelection {
        #[default] SkillsWithName,
        ThisWeapon,
        WeaponsWithName,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SkillBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub selection: SkillSelection,
    pub name: StringCriteria,
    pub specialization: StringCriteria,
    pub tags: StringCriteria,
}

impl SkillBonus {
    /// Bonus to skills whose name is `name` and specialization is `specialization`.
    pub fn for_skill(name: &str, specialization: &str, core: BonusCore) -> Self {
        Self {
            core,
            selection: SkillSelection::SkillsWithName,
            name: StringCriteria::is(name),
            specialization: if specialization.is_empty() {
                StringCriteria::any()
            } else {
                StringCriteria::is(specialization)
            },
            tags: StringCriteria::any(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SkillPointBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub name: StringCriteria,
    pub specialization: StringCriteria,
    pub tags: StringCriteria,
}

closed_enum! {
    /// Which property of a spell the name criterion is matched against.
    SpellMatch {
        #[default] AllColleges,
        CollegeName,
        PowerSourceName,
        SpellName,
    }
}

impl SpellMatch {
    pub fn matches(
        self,
        replacements: &crate::nameable::Replacements,
        criteria: &StringCriteria,
        name: &str,
        power_source: &str,
        colleges: &[String],
    ) -> bool {
        match self {
            Self::AllColleges => true,
            Self::SpellName => criteria.matches(replacements, name),
            Self::CollegeName => criteria.matches_list(replacements, colleges),
            Self::PowerSourceName => criteria.matches(replacements, power_source),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SpellBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub match_kind: SpellMatch,
    pub name: StringCriteria,
    pub tags: StringCriteria,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SpellPointBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub match_kind: SpellMatch,
    pub name: StringCriteria,
    pub tags: StringCriteria,
}

closed_enum! {
    /// Weapon statistic a [`WeaponBonus`] modifies.
    WeaponBonusKind {
        #[default] Damage,
        Accuracy,
        Bulk,
        DrDivisor,
        MinimumStrength,
        MinReach,
        MaxReach,
        HalfDamageRange,
        MinRange,
        MaxRange,
        Recoil,
        Block,
        Parry,
        RofMode1Shots,
        RofMode1Secondary,
        RofMode2Shots,
        RofMode2Secondary,
        NonChamberShots,
        ChamberShots,
        ShotDuration,
        ReloadTime,
    }
}

/// How a [`WeaponBonus`] picks its weapons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case")]
pub enum WeaponSelection {
    #[default]
    WithRequiredSkill,
    ThisWeapon,
    WithName,
    /// Selection written by a newer version; logged and ignored.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct WeaponBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub kind: WeaponBonusKind,
    pub selection: WeaponSelection,
    pub name: StringCriteria,
    pub specialization: StringCriteria,
    /// Criterion on the wielder's relative skill level.
    pub relative_level: NumericCriteria,
    pub tags: StringCriteria,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ReactionBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub situation: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ConditionalModifierBonus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub core: BonusCore,
    pub situation: String,
}

/// Reduction of the weight of a container's contents, e.g. `50%` or `5 lb`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ContainedWeightReduction {
    pub reduction: String,
}

impl ContainedWeightReduction {
    pub fn new(reduction: impl Into<String>) -> Self {
        Self {
            reduction: reduction.into(),
        }
    }

    pub fn is_percentage(&self) -> bool {
        self.reduction.trim_end().ends_with('%')
    }

    pub fn percentage(&self) -> Fxp {
        if !self.is_percentage() {
            return Fxp::ZERO;
        }
        self.reduction
            .trim()
            .trim_end_matches('%')
            .parse()
            .unwrap_or(Fxp::ZERO)
    }

    pub fn fixed(&self, default_unit: WeightUnit) -> Weight {
        if self.is_percentage() {
            return Weight::ZERO;
        }
        Weight::parse(&self.reduction, default_unit)
    }
}

impl_bonus!(
    AttributeBonus,
    DrBonus,
    SkillBonus,
    SkillPointBonus,
    SpellBonus,
    SpellPointBonus,
    ReactionBonus,
    ConditionalModifierBonus,
);

impl Bonus for WeaponBonus {
    fn core(&self) -> &BonusCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BonusCore {
        &mut self.core
    }

    // Damage bonuses level by dice rather than by the owner's level.
    fn level_unit(&self) -> &'static str {
        if self.kind == WeaponBonusKind::Damage {
            "die"
        } else {
            "level"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contained_weight_reduction_forms() {
        let pct = ContainedWeightReduction::new("50%");
        assert!(pct.is_percentage());
        assert_eq!(pct.percentage(), Fxp::from_int(50));
        assert_eq!(pct.fixed(WeightUnit::Pound), Weight::ZERO);

        let fixed = ContainedWeightReduction::new("5 lb");
        assert!(!fixed.is_percentage());
        assert_eq!(fixed.fixed(WeightUnit::Pound), Weight::pounds(5));
    }

    #[test]
    fn skill_bonus_for_named_skill() {
        let bonus = SkillBonus::for_skill("Merchant", "", BonusCore::new(-Fxp::TWO));
        let none = crate::nameable::Replacements::new();
        assert!(bonus.name.matches(&none, "merchant"));
        assert!(bonus.specialization.matches(&none, "anything"));
        assert_eq!(bonus.adjusted_amount(), -Fxp::TWO);
    }
}
