//! Level calculators for skills, techniques, spells and ritual-magic spells.
//!
//! The calculators are pure: everything they need from the character comes
//! through a [`LevelOracle`], so they can be exercised against a fixed table
//! of values as easily as against a live [`crate::Entity`].
//!
//! # Point staircase
//!
//! ```text
//! points  1   → relative level unchanged
//! points  2-3 → +1
//! points  4+  → +1 + floor(points / 4)
//! ```

use core::fmt;
use std::collections::BTreeSet;

use crate::fxp::Fxp;

use super::default::SkillDefault;

/// Computed level of a skill or spell. Replaced wholesale on every update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub level: Fxp,
    pub relative_level: Fxp,
    pub tooltip: String,
}

impl Level {
    /// A level that could not be computed.
    pub fn none() -> Self {
        Self {
            level: Fxp::MIN,
            relative_level: Fxp::ZERO,
            tooltip: String::new(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.level != Fxp::MIN
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::none()
    }
}

/// Skill difficulty.
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
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    #[strum(serialize = "e")]
    #[cfg_attr(feature = "serde", serde(rename = "e"))]
    Easy,
    #[default]
    #[strum(serialize = "a")]
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    Average,
    #[strum(serialize = "h")]
    #[cfg_attr(feature = "serde", serde(rename = "h"))]
    Hard,
    #[strum(serialize = "vh")]
    #[cfg_attr(feature = "serde", serde(rename = "vh"))]
    VeryHard,
    #[strum(serialize = "w")]
    #[cfg_attr(feature = "serde", serde(rename = "w"))]
    Wildcard,
}

impl Difficulty {
    /// Relative level bought by a single point.
    pub const fn base_relative_level(self) -> Fxp {
        match self {
            Self::Easy => Fxp::ZERO,
            Self::Average => Fxp::from_int(-1),
            Self::Hard => Fxp::from_int(-2),
            Self::VeryHard | Self::Wildcard => Fxp::from_int(-3),
        }
    }
}

/// Controlling attribute plus difficulty, e.g. `DX/A`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AttributeDifficulty {
    pub attribute: String,
    pub difficulty: Difficulty,
}

impl AttributeDifficulty {
    pub fn new(attribute: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            attribute: attribute.into(),
            difficulty,
        }
    }
}

impl Default for AttributeDifficulty {
    fn default() -> Self {
        Self::new("dx", Difficulty::Average)
    }
}

impl fmt::Display for AttributeDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.attribute.to_uppercase(),
            self.difficulty.as_ref().to_uppercase()
        )
    }
}

/// Skills already on the current resolution chain, keyed by display name.
///
/// Each chain extends its own copy, so sibling chains never see each other's
/// entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exclusions(BTreeSet<String>);

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.insert(key.into());
        next
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

/// Read-only view of the character consulted by the calculators.
pub trait LevelOracle {
    /// Current value of an attribute, or [`Fxp::MIN`] if it does not exist.
    fn attribute_current(&self, attribute: &str) -> Fxp;

    /// Sum of skill bonuses aimed at a skill, appended to `tooltip`.
    fn skill_bonus_for(
        &self,
        name: &str,
        specialization: &str,
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp;

    /// Sum of spell bonuses aimed at a spell, appended to `tooltip`.
    fn spell_bonus_for(
        &self,
        name: &str,
        power_source: &str,
        colleges: &[String],
        tags: &[String],
        tooltip: Option<&mut String>,
    ) -> Fxp;

    /// Encumbrance penalty applicable to skills (zero or negative).
    fn encumbrance_penalty(&self) -> Fxp;

    /// Level a technique builds on: the best skill named by `default`, or
    /// the attribute it names, before the default's modifier.
    fn default_base_level(
        &self,
        default: &SkillDefault,
        require_points: bool,
        excludes: &Exclusions,
    ) -> Fxp;
}

/// Inputs for [`calculate_skill_level`].
#[derive(Clone, Copy, Debug)]
pub struct SkillLevelInput<'a> {
    pub name: &'a str,
    pub specialization: &'a str,
    pub tags: &'a [String],
    pub difficulty: &'a AttributeDifficulty,
    pub points: Fxp,
    pub encumbrance_multiplier: Fxp,
    /// Best default, with its adjusted level and points-equivalent filled in.
    pub default: Option<&'a SkillDefault>,
}

fn staircase(relative: Fxp, points: Fxp) -> Option<Fxp> {
    if points == Fxp::ONE {
        Some(relative)
    } else if points > Fxp::ONE && points < Fxp::FOUR {
        Some(relative + Fxp::ONE)
    } else if points >= Fxp::FOUR {
        Some(relative + Fxp::ONE + (points / Fxp::FOUR).trunc())
    } else {
        None
    }
}

pub fn calculate_skill_level<O>(oracle: &O, input: SkillLevelInput<'_>) -> Level
where
    O: LevelOracle + ?Sized,
{
    let mut tooltip = String::new();
    let difficulty = input.difficulty.difficulty;
    let wildcard = difficulty == Difficulty::Wildcard;
    let mut relative = difficulty.base_relative_level();
    let mut level = oracle.attribute_current(&input.difficulty.attribute);
    if level == Fxp::MIN {
        return Level::none();
    }

    let mut points = input.points;
    if wildcard {
        points = points / Fxp::THREE;
    } else if let Some(default) = input.default.filter(|d| d.points.is_positive()) {
        points += default.points;
    }
    points = points.trunc();

    match staircase(relative, points) {
        Some(stepped) => relative = stepped,
        None => match input.default.filter(|d| !wildcard && d.points.is_negative()) {
            Some(default) => relative = default.adjusted_level - level,
            None => return Level::none(),
        },
    }

    level += relative;
    if !wildcard {
        if let Some(default) = input.default {
            level = level.max(default.adjusted_level);
        }
    }

    let bonus = oracle.skill_bonus_for(input.name, input.specialization, input.tags, Some(&mut tooltip));
    level += bonus;
    relative += bonus;

    let penalty = oracle.encumbrance_penalty() * input.encumbrance_multiplier;
    if !penalty.is_zero() {
        level += penalty;
        tooltip.push_str(&format!("\nEncumbrance [{}]", penalty.string_with_sign()));
    }

    Level {
        level,
        relative_level: relative,
        tooltip,
    }
}

/// Inputs for [`calculate_technique_level`].
#[derive(Clone, Copy, Debug)]
pub struct TechniqueLevelInput<'a> {
    pub name: &'a str,
    pub specialization: &'a str,
    pub tags: &'a [String],
    pub default: &'a SkillDefault,
    pub difficulty: Difficulty,
    pub points: Fxp,
    pub require_points: bool,
    /// Maximum level above the base, if capped.
    pub limit_modifier: Option<Fxp>,
    /// Chain already being resolved, including the technique itself.
    pub excludes: &'a Exclusions,
}

pub fn calculate_technique_level<O>(oracle: &O, input: TechniqueLevelInput<'_>) -> Level
where
    O: LevelOracle + ?Sized,
{
    let mut tooltip = String::new();
    let base = oracle.default_base_level(input.default, input.require_points, input.excludes);
    if base == Fxp::MIN {
        return Level::none();
    }

    let mut level = base + input.default.modifier;
    let mut points = input.points;
    if input.difficulty == Difficulty::Hard {
        points -= Fxp::ONE;
    }
    let mut relative = if points.is_positive() { points } else { Fxp::ZERO };
    relative += oracle.skill_bonus_for(input.name, input.specialization, input.tags, Some(&mut tooltip));
    level += relative;

    if let Some(limit) = input.limit_modifier {
        let max = base + limit;
        if level > max {
            relative -= level - max;
            level = max;
        }
    }

    Level {
        level,
        relative_level: relative,
        tooltip,
    }
}

/// Inputs for [`calculate_spell_level`].
#[derive(Clone, Copy, Debug)]
pub struct SpellLevelInput<'a> {
    pub name: &'a str,
    pub power_source: &'a str,
    pub colleges: &'a [String],
    pub tags: &'a [String],
    pub difficulty: &'a AttributeDifficulty,
    pub points: Fxp,
}

pub fn calculate_spell_level<O>(oracle: &O, input: SpellLevelInput<'_>) -> Level
where
    O: LevelOracle + ?Sized,
{
    let mut tooltip = String::new();
    let difficulty = input.difficulty.difficulty;
    let mut level = oracle.attribute_current(&input.difficulty.attribute);
    if level == Fxp::MIN {
        return Level::none();
    }

    let mut points = input.points.trunc();
    if difficulty == Difficulty::Wildcard {
        points = (points / Fxp::THREE).trunc();
    }
    let Some(mut relative) = staircase(difficulty.base_relative_level(), points) else {
        return Level::none();
    };

    relative += oracle.spell_bonus_for(
        input.name,
        input.power_source,
        input.colleges,
        input.tags,
        Some(&mut tooltip),
    );
    relative = relative.trunc();
    level += relative;

    Level {
        level,
        relative_level: relative,
        tooltip,
    }
}

/// Inputs for [`calculate_ritual_magic_spell_level`].
#[derive(Clone, Copy, Debug)]
pub struct RitualMagicInput<'a> {
    pub name: &'a str,
    pub power_source: &'a str,
    pub colleges: &'a [String],
    pub tags: &'a [String],
    pub difficulty: Difficulty,
    pub points: Fxp,
    /// Skill the spell is cast through, usually "Ritual Magic".
    pub base_skill: &'a str,
    /// Number of prerequisite spells; each costs -1.
    pub prerequisite_count: i64,
    pub excludes: &'a Exclusions,
}

/// Ritual-magic penalty for falling back to the unspecialized ritual skill.
const UNSPECIALIZED_FALLBACK: Fxp = Fxp::from_int(-6);

pub fn calculate_ritual_magic_spell_level<O>(oracle: &O, input: RitualMagicInput<'_>) -> Level
where
    O: LevelOracle + ?Sized,
{
    let mut best = if input.colleges.is_empty() {
        ritual_level_for_college(oracle, &input, "")
    } else {
        input
            .colleges
            .iter()
            .map(|college| ritual_level_for_college(oracle, &input, college))
            .fold(Level::none(), |best, candidate| {
                if candidate.level > best.level { candidate } else { best }
            })
    };

    if best.is_known() {
        let bonus = oracle
            .spell_bonus_for(
                input.name,
                input.power_source,
                input.colleges,
                input.tags,
                Some(&mut best.tooltip),
            )
            .trunc();
        best.level += bonus;
        best.relative_level += bonus;
    }
    best
}

fn ritual_level_for_college<O>(oracle: &O, input: &RitualMagicInput<'_>, college: &str) -> Level
where
    O: LevelOracle + ?Sized,
{
    // With no college there is nothing to specialize in, so no skill can match.
    let skill_name = if college.is_empty() { "" } else { input.base_skill };
    let mut default = SkillDefault::skill(
        skill_name,
        college,
        Fxp::from_int(-input.prerequisite_count),
    );
    let technique = |default: &SkillDefault| {
        let mut level = calculate_technique_level(
            oracle,
            TechniqueLevelInput {
                name: input.name,
                specialization: college,
                tags: input.tags,
                default,
                difficulty: input.difficulty,
                points: input.points,
                require_points: false,
                limit_modifier: Some(Fxp::ZERO),
                excludes: input.excludes,
            },
        );
        // The technique calculator folds the modifier into the level only.
        level.relative_level += default.modifier;
        level
    };

    let specialized = technique(&default);
    default.specialization.clear();
    default.modifier += UNSPECIALIZED_FALLBACK;
    let fallback = technique(&default);
    if specialized.level >= fallback.level {
        specialized
    } else {
        fallback
    }
}
