//! Interpretation of equipment modifier amounts.

use crate::fxp::Fxp;
use crate::weight::WeightUnit;

/// Step of the cost or weight pipeline a modifier applies to.
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
pub enum AdjustmentPhase {
    /// Applied to the item's own value or weight.
    #[default]
    Original,
    Base,
    FinalBase,
    Final,
}

impl AdjustmentPhase {
    pub const ALL: [Self; 4] = [Self::Original, Self::Base, Self::FinalBase, Self::Final];
}

/// A parsed modifier amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierValue {
    /// Added to the running value; weights are in pounds.
    Addition(Fxp),
    /// Percent of the value the phase started from.
    Percentage(Fxp),
    /// Multiplies the running value.
    Multiplier(Fxp),
}

impl ModifierValue {
    /// `x2`, `x1/2`, `2x` and `x50%` are multipliers, `-10%` is a percentage,
    /// anything else an addition. Unparsable text adds nothing.
    pub fn parse_cost(text: &str) -> Self {
        let text = text.trim();
        if let Some(body) = multiplier_body(text) {
            return Self::Multiplier(parse_multiplier(body));
        }
        if let Some(body) = text.strip_suffix('%') {
            return Self::Percentage(parse_number(body));
        }
        Self::Addition(parse_number(text))
    }

    /// Like [`ModifierValue::parse_cost`], except additions may carry a unit
    /// (`+2 kg`) and are converted to pounds. After the original phase a bare
    /// percentage scales the running weight instead of adding to it.
    pub fn parse_weight(text: &str, phase: AdjustmentPhase, default_unit: WeightUnit) -> Self {
        let text = text.trim();
        if let Some(body) = multiplier_body(text) {
            return Self::Multiplier(parse_multiplier(body));
        }
        if let Some(body) = text.strip_suffix('%') {
            let amount = parse_number(body);
            return if phase == AdjustmentPhase::Original {
                Self::Percentage(amount)
            } else {
                Self::Multiplier((amount / Fxp::HUNDRED).max(Fxp::ZERO))
            };
        }
        let (number, unit) = WeightUnit::split_trailing(text, default_unit);
        Self::Addition(unit.to_pounds(parse_fraction(number)))
    }
}

fn multiplier_body(text: &str) -> Option<&str> {
    let body = text.trim_start_matches('+');
    body.strip_prefix(['x', 'X', '×'])
        .or_else(|| body.strip_suffix(['x', 'X', '×']))
        .map(str::trim)
}

fn parse_multiplier(body: &str) -> Fxp {
    let value = match body.strip_suffix('%') {
        Some(percent) => parse_number(percent) / Fxp::HUNDRED,
        None => parse_fraction(body),
    };
    if value.is_positive() { value } else { Fxp::ONE }
}

fn parse_fraction(text: &str) -> Fxp {
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let denominator = parse_number(denominator);
            if denominator.is_zero() {
                Fxp::ZERO
            } else {
                parse_number(numerator) / denominator
            }
        }
        None => parse_number(text),
    }
}

fn parse_number(text: &str) -> Fxp {
    text.trim().parse().unwrap_or(Fxp::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_amounts() {
        assert_eq!(ModifierValue::parse_cost("+25"), ModifierValue::Addition(Fxp::from_int(25)));
        assert_eq!(ModifierValue::parse_cost("-10%"), ModifierValue::Percentage(Fxp::from_int(-10)));
        assert_eq!(ModifierValue::parse_cost("x2"), ModifierValue::Multiplier(Fxp::TWO));
        assert_eq!(ModifierValue::parse_cost("3x"), ModifierValue::Multiplier(Fxp::THREE));
        assert_eq!(ModifierValue::parse_cost("x1/2"), ModifierValue::Multiplier(Fxp::HALF));
        assert_eq!(ModifierValue::parse_cost("x50%"), ModifierValue::Multiplier(Fxp::HALF));
        assert_eq!(ModifierValue::parse_cost("x0"), ModifierValue::Multiplier(Fxp::ONE));
        assert_eq!(ModifierValue::parse_cost("junk"), ModifierValue::Addition(Fxp::ZERO));
    }

    #[test]
    fn weight_amounts() {
        let lb = WeightUnit::Pound;
        assert_eq!(
            ModifierValue::parse_weight("+2 kg", AdjustmentPhase::Original, lb),
            ModifierValue::Addition(Fxp::FOUR)
        );
        assert_eq!(
            ModifierValue::parse_weight("1/2", AdjustmentPhase::Base, lb),
            ModifierValue::Addition(Fxp::HALF)
        );
        assert_eq!(
            ModifierValue::parse_weight("-25%", AdjustmentPhase::Original, lb),
            ModifierValue::Percentage(Fxp::from_int(-25))
        );
        assert_eq!(
            ModifierValue::parse_weight("50%", AdjustmentPhase::Final, lb),
            ModifierValue::Multiplier(Fxp::HALF)
        );
    }
}
