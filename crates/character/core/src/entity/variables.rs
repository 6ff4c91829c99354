//! Attribute values and `$variable` resolution.
//!
//! Attribute bases are expressions (`$iq`, `($dx+$ht)/4`) resolved through
//! the character's [`TextResolver`](crate::text::TextResolver). Resolved
//! bases are memoized in the scratch; an attribute whose base refers back to
//! itself resolves to nothing.

use crate::attribute::AttributeDef;
use crate::fxp::Fxp;
use crate::text::VariableResolver;

use super::Entity;

/// Pseudo-attribute that is always 10, for skills based on a flat value.
pub const TEN_ATTRIBUTE: &str = "10";

/// Variable holding the adjusted size modifier.
pub const SIZE_MODIFIER_VARIABLE: &str = "sm";

const CURRENT_SUFFIX: &str = ".current";

impl Entity {
    /// Resolved base of an attribute, or `None` while it is already being
    /// resolved further up the stack.
    fn attribute_base(&self, def: &AttributeDef) -> Option<Fxp> {
        if let Some(base) = self.scratch.bases.borrow().get(&def.id) {
            return Some(*base);
        }
        if !self.scratch.resolving.borrow_mut().insert(def.id.clone()) {
            tracing::warn!(attribute = %def.id, "attribute base refers to itself");
            return None;
        }
        let base = self.resolver.resolve_number(Some(self), &def.id, &def.base);
        self.scratch.resolving.borrow_mut().remove(&def.id);
        self.scratch.bases.borrow_mut().insert(def.id.clone(), base);
        Some(base)
    }

    /// Current value of an attribute (maximum less damage for pools), or
    /// [`Fxp::MIN`] if it does not exist.
    pub fn attribute_current(&self, id: &str) -> Fxp {
        if id == TEN_ATTRIBUTE {
            return Fxp::TEN;
        }
        let (Some(def), Some(attr)) = (self.settings.attributes.get(id), self.attributes.get(id)) else {
            return Fxp::MIN;
        };
        match self.attribute_base(def) {
            Some(base) => attr.current(def, base),
            None => Fxp::MIN,
        }
    }

    /// Maximum value of an attribute, or [`Fxp::MIN`] if it does not exist.
    pub fn attribute_maximum(&self, id: &str) -> Fxp {
        if id == TEN_ATTRIBUTE {
            return Fxp::TEN;
        }
        let (Some(def), Some(attr)) = (self.settings.attributes.get(id), self.attributes.get(id)) else {
            return Fxp::MIN;
        };
        match self.attribute_base(def) {
            Some(base) => attr.maximum(def, base),
            None => Fxp::MIN,
        }
    }

    /// Value an attribute prerequisite compares against.
    pub fn attribute_value(&self, id: &str) -> Fxp {
        self.attribute_current(id)
    }

    /// Display name of an attribute; the id itself if it is unknown.
    pub fn attribute_name(&self, id: &str) -> String {
        self.settings
            .attributes
            .get(id)
            .map(|def| def.name.clone())
            .unwrap_or_else(|| id.to_uppercase())
    }
}

impl VariableResolver for Entity {
    fn resolve_variable(&self, name: &str) -> String {
        if name == SIZE_MODIFIER_VARIABLE {
            return self.profile.adjusted_size_modifier().to_string();
        }
        let (id, current) = match name.strip_suffix(CURRENT_SUFFIX) {
            Some(id) => (id, true),
            None => (name, false),
        };
        if self.settings.attributes.get(id).is_none() {
            tracing::warn!(variable = %name, "unable to resolve variable");
            return String::new();
        }
        let value = if current {
            self.attribute_current(id)
        } else {
            self.attribute_maximum(id)
        };
        if value == Fxp::MIN {
            String::new()
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeDef, AttributeKind};
    use crate::config::SheetSettings;

    #[test]
    fn derived_attributes_follow_their_bases() {
        let mut entity = Entity::default();
        entity.attributes.get_mut("dx").unwrap().adjustment = Fxp::TWO;
        entity.attributes.get_mut("ht").unwrap().adjustment = Fxp::ONE;
        assert_eq!(entity.attribute_current("basic_speed"), Fxp::from_ratio(23, 4));
        assert_eq!(entity.attribute_current("basic_move"), Fxp::FIVE);
        assert_eq!(entity.attribute_current("per"), Fxp::TEN);
        assert_eq!(entity.attribute_current("10"), Fxp::TEN);
        assert_eq!(entity.attribute_current("nope"), Fxp::MIN);
    }

    #[test]
    fn pools_report_current_and_maximum() {
        let mut entity = Entity::default();
        entity.attributes.get_mut("hp").unwrap().damage = Some(Fxp::THREE);
        assert_eq!(entity.resolve_variable("hp"), "10");
        assert_eq!(entity.resolve_variable("hp.current"), "7");
        assert_eq!(entity.resolve_variable("sm"), "0");
        assert_eq!(entity.resolve_variable("luck"), "");
    }

    #[test]
    fn self_referential_base_resolves_to_nothing() {
        let mut settings = SheetSettings::default();
        settings
            .attributes
            .0
            .push(AttributeDef::new("loop", "Loop", AttributeKind::Integer, "$loop + 1", 5));
        let entity = Entity::new(settings, &crate::config::GeneralSettings::default());
        // The inner reference yields zero, so the outer value is 0 + 1.
        assert_eq!(entity.attribute_current("loop"), Fxp::ONE);
    }
}
