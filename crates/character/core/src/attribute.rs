//! Attribute definitions and a character's attribute values.
//!
//! An [`AttributeDef`] lives in the sheet settings and says how an attribute
//! is computed and priced; an [`Attribute`] is the character's purchased
//! adjustment plus the transient bonus and cost reduction collected from
//! features on every recalculation.

use crate::fxp::Fxp;

/// How an attribute's value behaves.
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
pub enum AttributeKind {
    /// Whole numbers; bonuses are truncated.
    #[default]
    Integer,
    /// Fractional values such as Basic Speed.
    Decimal,
    /// A maximum with a current value reduced by damage (HP, FP).
    Pool,
}

#[cfg(feature = "serde")]
fn fxp_is_zero(v: &Fxp) -> bool {
    v.is_zero()
}

/// Definition of one attribute.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AttributeDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub full_name: String,
    pub kind: AttributeKind,
    /// Starting value: a number or an expression such as `$iq` or `($dx+$ht)/4`.
    pub base: String,
    pub cost_per_point: Fxp,
    /// Percent discount per point of positive size modifier.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "fxp_is_zero"))]
    pub cost_adj_percent_per_sm: Fxp,
}

impl AttributeDef {
    pub fn new(id: &str, name: &str, kind: AttributeKind, base: &str, cost_per_point: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            full_name: String::new(),
            kind,
            base: base.to_string(),
            cost_per_point: Fxp::from_int(cost_per_point),
            cost_adj_percent_per_sm: Fxp::ZERO,
        }
    }

    #[must_use]
    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    #[must_use]
    pub fn with_sm_discount(mut self, percent: i64) -> Self {
        self.cost_adj_percent_per_sm = Fxp::from_int(percent);
        self
    }

    pub fn is_decimal(&self) -> bool {
        self.kind == AttributeKind::Decimal
    }

    pub fn is_pool(&self) -> bool {
        self.kind == AttributeKind::Pool
    }

    /// Point cost of `adjustment` levels.
    ///
    /// `cost_reduction` is a percentage; a positive size modifier adds its
    /// per-SM discount, except for HP of characters at SM 0 or below. The
    /// combined reduction is capped at 80% and the result rounded up.
    pub fn compute_cost(&self, adjustment: Fxp, cost_reduction: Fxp, size_modifier: i64) -> Fxp {
        let mut cost = adjustment * self.cost_per_point;
        let mut reduction = cost_reduction;
        if size_modifier > 0 && self.cost_adj_percent_per_sm.is_positive() {
            reduction += Fxp::from_int(size_modifier) * self.cost_adj_percent_per_sm;
        }
        reduction = reduction.min(Fxp::EIGHTY);
        if reduction.is_positive() {
            cost = cost * (Fxp::HUNDRED - reduction) / Fxp::HUNDRED;
        }
        cost.ceil()
    }
}

/// Ordered set of attribute definitions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct AttributeDefs(pub Vec<AttributeDef>);

impl AttributeDefs {
    /// The Basic Set attributes.
    pub fn standard() -> Self {
        use AttributeKind::{Decimal, Integer, Pool};
        Self(vec![
            AttributeDef::new("st", "ST", Integer, "10", 10)
                .with_full_name("Strength")
                .with_sm_discount(10),
            AttributeDef::new("dx", "DX", Integer, "10", 20).with_full_name("Dexterity"),
            AttributeDef::new("iq", "IQ", Integer, "10", 20).with_full_name("Intelligence"),
            AttributeDef::new("ht", "HT", Integer, "10", 10).with_full_name("Health"),
            AttributeDef::new("will", "Will", Integer, "$iq", 5),
            AttributeDef::new("fright_check", "Fright Check", Integer, "$will", 2),
            AttributeDef::new("per", "Per", Integer, "$iq", 5).with_full_name("Perception"),
            AttributeDef::new("vision", "Vision", Integer, "$per", 2),
            AttributeDef::new("hearing", "Hearing", Integer, "$per", 2),
            AttributeDef::new("taste_smell", "Taste & Smell", Integer, "$per", 2),
            AttributeDef::new("touch", "Touch", Integer, "$per", 2),
            AttributeDef::new("basic_speed", "Basic Speed", Decimal, "($dx+$ht)/4", 20),
            AttributeDef::new("basic_move", "Basic Move", Integer, "floor($basic_speed)", 5),
            AttributeDef::new("fp", "FP", Pool, "$ht", 3).with_full_name("Fatigue Points"),
            AttributeDef::new("hp", "HP", Pool, "$st", 2)
                .with_full_name("Hit Points")
                .with_sm_discount(10),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&AttributeDef> {
        self.0.iter().find(|def| def.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDef> {
        self.0.iter()
    }
}

impl Default for AttributeDefs {
    fn default() -> Self {
        Self::standard()
    }
}

/// A character's value for one attribute.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Attribute {
    pub attr_id: String,
    /// Purchased levels above (or below) the base.
    pub adjustment: Fxp,
    /// Damage taken, for pools only.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub damage: Option<Fxp>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub bonus: Fxp,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cost_reduction: Fxp,
}

impl Attribute {
    pub fn new(def: &AttributeDef) -> Self {
        Self {
            attr_id: def.id.clone(),
            adjustment: Fxp::ZERO,
            damage: def.is_pool().then_some(Fxp::ZERO),
            bonus: Fxp::ZERO,
            cost_reduction: Fxp::ZERO,
        }
    }

    /// Value from a resolved `base`: base plus adjustment plus bonus,
    /// truncated unless the attribute is decimal.
    pub fn maximum(&self, def: &AttributeDef, base: Fxp) -> Fxp {
        let value = base + self.adjustment + self.bonus;
        if def.is_decimal() { value } else { value.trunc() }
    }

    /// Maximum less damage for pools; the maximum otherwise.
    pub fn current(&self, def: &AttributeDef, base: Fxp) -> Fxp {
        let max = self.maximum(def, base);
        match (def.is_pool(), self.damage) {
            (true, Some(damage)) => max - damage,
            _ => max,
        }
    }

    pub fn point_cost(&self, def: &AttributeDef, size_modifier: i64) -> Fxp {
        // HP does not get the size discount for small characters.
        let sm = if def.id == "hp" && size_modifier <= 0 { 0 } else { size_modifier };
        def.compute_cost(self.adjustment, self.cost_reduction, sm)
    }
}

/// A character's attributes, in definition order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    pub fn new(defs: &AttributeDefs) -> Self {
        Self(defs.iter().map(Attribute::new).collect())
    }

    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.attr_id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        self.0.iter_mut().find(|a| a.attr_id == id)
    }

    /// Adds missing attributes and drops those without a definition.
    pub fn sync(&mut self, defs: &AttributeDefs) {
        let mut synced = Vec::with_capacity(defs.0.len());
        for def in defs.iter() {
            match self.0.iter().position(|a| a.attr_id == def.id) {
                Some(i) => synced.push(self.0.swap_remove(i)),
                None => synced.push(Attribute::new(def)),
            }
        }
        self.0 = synced;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_applies_reduction_cap_and_rounds_up() {
        let st = AttributeDefs::standard().get("st").cloned().unwrap();
        assert_eq!(st.compute_cost(Fxp::THREE, Fxp::ZERO, 0), Fxp::from_int(30));
        // 40% from features plus SM +2 at 10% each
        assert_eq!(st.compute_cost(Fxp::THREE, Fxp::from_int(40), 2), Fxp::from_int(12));
        // capped at 80%
        assert_eq!(st.compute_cost(Fxp::THREE, Fxp::from_int(95), 0), Fxp::SIX);
        // 7 * 10 * 0.85 = 59.5
        assert_eq!(st.compute_cost(Fxp::from_int(7), Fxp::from_int(15), 0), Fxp::from_int(60));
        assert_eq!(st.compute_cost(-Fxp::TWO, Fxp::ZERO, 0), Fxp::from_int(-20));
    }

    #[test]
    fn hp_ignores_size_discount_when_small() {
        let hp_def = AttributeDefs::standard().get("hp").cloned().unwrap();
        let mut hp = Attribute::new(&hp_def);
        hp.adjustment = Fxp::FIVE;
        assert_eq!(hp.point_cost(&hp_def, -1), Fxp::TEN);
        assert_eq!(hp.point_cost(&hp_def, 1), Fxp::from_int(9));
    }

    #[test]
    fn maximum_and_current() {
        let defs = AttributeDefs::standard();
        let speed = defs.get("basic_speed").unwrap();
        let mut attr = Attribute::new(speed);
        attr.adjustment = Fxp::HALF;
        assert_eq!(attr.maximum(speed, Fxp::from_ratio(21, 4)), Fxp::from_ratio(23, 4));

        let hp = defs.get("hp").unwrap();
        let mut pool = Attribute::new(hp);
        pool.bonus = Fxp::from_ratio(5, 2);
        pool.damage = Some(Fxp::FOUR);
        assert_eq!(pool.maximum(hp, Fxp::TEN), Fxp::from_int(12));
        assert_eq!(pool.current(hp, Fxp::TEN), Fxp::from_int(8));
    }

    #[test]
    fn sync_follows_definitions() {
        let defs = AttributeDefs::standard();
        let mut attrs = Attributes(vec![Attribute {
            attr_id: "iq".into(),
            adjustment: Fxp::TWO,
            ..Attribute::default()
        }]);
        attrs.sync(&defs);
        assert_eq!(attrs.0.len(), defs.0.len());
        assert_eq!(attrs.0[0].attr_id, "st");
        assert_eq!(attrs.get("iq").map(|a| a.adjustment), Some(Fxp::TWO));
        assert_eq!(attrs.get("hp").and_then(|a| a.damage), Some(Fxp::ZERO));
    }
}
