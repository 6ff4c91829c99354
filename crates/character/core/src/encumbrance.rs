//! Encumbrance levels.

use crate::fxp::Fxp;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
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
pub enum Encumbrance {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
    ExtraHeavy,
}

impl Encumbrance {
    pub const ALL: [Self; 5] = [Self::None, Self::Light, Self::Medium, Self::Heavy, Self::ExtraHeavy];

    /// Zero for no encumbrance down to -4 for extra-heavy.
    pub fn penalty(self) -> Fxp {
        match self {
            Self::None => Fxp::ZERO,
            Self::Light => Fxp::from_int(-1),
            Self::Medium => Fxp::from_int(-2),
            Self::Heavy => Fxp::from_int(-3),
            Self::ExtraHeavy => Fxp::from_int(-4),
        }
    }

    /// Multiple of Basic Lift that can be carried at this level.
    pub fn weight_multiplier(self) -> Fxp {
        match self {
            Self::None => Fxp::ONE,
            Self::Light => Fxp::TWO,
            Self::Medium => Fxp::THREE,
            Self::Heavy => Fxp::SIX,
            Self::ExtraHeavy => Fxp::TEN,
        }
    }

    /// Move at this level from an unencumbered move. Never drops below one
    /// unless the base is already zero.
    pub fn move_for(self, basic_move: Fxp) -> Fxp {
        let initial = basic_move.max(Fxp::ZERO);
        let moved = (initial * (Fxp::TEN + Fxp::TWO * self.penalty()) / Fxp::TEN).trunc();
        if moved < Fxp::ONE {
            if initial.is_positive() { Fxp::ONE } else { Fxp::ZERO }
        } else {
            moved
        }
    }

    /// Dodge at this level. Never below one.
    pub fn dodge_for(self, basic_speed: Fxp, dodge_bonus: Fxp) -> Fxp {
        let dodge = Fxp::THREE + dodge_bonus + basic_speed.max(Fxp::ZERO);
        (dodge + self.penalty()).max(Fxp::ONE).trunc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_scales_by_fifths() {
        let basic = Fxp::FIVE;
        let moves: Vec<i64> = Encumbrance::ALL.iter().map(|e| e.move_for(basic).as_int()).collect();
        assert_eq!(moves, vec![5, 4, 3, 2, 1]);
        assert_eq!(Encumbrance::ExtraHeavy.move_for(Fxp::TWO), Fxp::ONE);
        assert_eq!(Encumbrance::Light.move_for(Fxp::ZERO), Fxp::ZERO);
    }

    #[test]
    fn dodge_applies_penalty_and_floor() {
        let speed = Fxp::from_ratio(23, 4);
        assert_eq!(Encumbrance::None.dodge_for(speed, Fxp::ZERO), Fxp::from_int(8));
        assert_eq!(Encumbrance::Heavy.dodge_for(speed, Fxp::ONE), Fxp::SIX);
        assert_eq!(Encumbrance::ExtraHeavy.dodge_for(Fxp::ZERO, Fxp::ZERO), Fxp::ONE);
    }
}
