//! Skill defaults: "Broadsword defaults to DX-5 or Shortsword-2".

use crate::fxp::Fxp;

/// One way a skill can be used without points in it.
///
/// `default_type` is either an attribute id or one of the skill-based types
/// ([`SkillDefault::SKILL`], [`SkillDefault::PARRY`], [`SkillDefault::BLOCK`]).
/// `level`, `adjusted_level` and `points` are computed during best-default
/// selection and never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SkillDefault {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub default_type: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub specialization: String,
    pub modifier: Fxp,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub level: Fxp,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub adjusted_level: Fxp,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub points: Fxp,
}

impl SkillDefault {
    pub const SKILL: &'static str = "skill";
    pub const PARRY: &'static str = "parry";
    pub const BLOCK: &'static str = "block";

    pub fn skill(name: impl Into<String>, specialization: impl Into<String>, modifier: Fxp) -> Self {
        Self {
            default_type: Self::SKILL.to_string(),
            name: name.into(),
            specialization: specialization.into(),
            modifier,
            ..Self::default()
        }
    }

    pub fn attribute(attribute: impl Into<String>, modifier: Fxp) -> Self {
        Self {
            default_type: attribute.into(),
            modifier,
            ..Self::default()
        }
    }

    pub fn is_skill_based(&self) -> bool {
        let t = self.default_type.as_str();
        t.eq_ignore_ascii_case(Self::SKILL)
            || t.eq_ignore_ascii_case(Self::PARRY)
            || t.eq_ignore_ascii_case(Self::BLOCK)
    }

    /// Same reference and modifier, ignoring computed fields.
    pub fn equivalent(&self, other: Option<&SkillDefault>) -> bool {
        other.is_some_and(|o| {
            self.default_type.eq_ignore_ascii_case(&o.default_type)
                && self.name == o.name
                && self.specialization == o.specialization
                && self.modifier == o.modifier
        })
    }

    /// Copy with the computed fields reset.
    pub fn without_level_or_points(&self) -> Self {
        Self {
            level: Fxp::ZERO,
            adjusted_level: Fxp::ZERO,
            points: Fxp::ZERO,
            ..self.clone()
        }
    }

    /// Human-readable source, e.g. `Shortsword (Knife)` or `DX`.
    pub fn full_name(&self) -> String {
        if self.is_skill_based() {
            let mut name = self.name.clone();
            if !self.specialization.is_empty() {
                name.push_str(&format!(" ({})", self.specialization));
            }
            if self.default_type.eq_ignore_ascii_case(Self::PARRY) {
                name.push_str(" Parry");
            } else if self.default_type.eq_ignore_ascii_case(Self::BLOCK) {
                name.push_str(" Block");
            }
            name
        } else {
            self.default_type.to_uppercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_and_naming() {
        let d = SkillDefault::skill("Shortsword", "", Fxp::from_int(-2));
        assert!(d.is_skill_based());
        assert_eq!(d.full_name(), "Shortsword");

        let mut parry = SkillDefault::skill("Judo", "", Fxp::ZERO);
        parry.default_type = SkillDefault::PARRY.into();
        assert!(parry.is_skill_based());
        assert_eq!(parry.full_name(), "Judo Parry");

        let attr = SkillDefault::attribute("dx", Fxp::from_int(-5));
        assert!(!attr.is_skill_based());
        assert_eq!(attr.full_name(), "DX");
    }

    #[test]
    fn equivalence_ignores_computed_fields() {
        let a = SkillDefault::skill("Axe/Mace", "", Fxp::from_int(-3));
        let mut b = a.clone();
        b.level = Fxp::TEN;
        b.points = Fxp::TWO;
        assert!(a.equivalent(Some(&b)));
        assert!(!a.equivalent(None));
        assert_eq!(b.without_level_or_points(), a);
    }
}
