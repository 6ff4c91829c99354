//! Source-content hashing.
//!
//! A source hash is SHA-256 over the JSON rendering of an element's persisted
//! fields. Recalculated values and rebuilt links are `serde(skip)` already;
//! the open flag of container nodes and the character's modification time
//! are persisted but projected away here, so recalculating, expanding a
//! container or merely touching a sheet never changes its hash.
//!
//! `serde_json`'s map type is ordered by key, which keeps the bytes stable
//! for any content.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::entity::Entity;
use crate::equipment::{Equipment, EquipmentModifier};
use crate::note::Note;
use crate::skill::Skill;
use crate::spell::Spell;
use crate::template::Template;
use crate::traits::{Trait, TraitModifier};
use crate::tree::Node;

pub type SourceDigest = [u8; 32];

pub trait SourceHash {
    /// JSON view of the fields that come from the data file.
    fn source_view(&self) -> serde_json::Result<Value>;

    fn source_hash(&self) -> SourceDigest {
        let mut hasher = Sha256::new();
        match self.source_view().and_then(|view| serde_json::to_vec(&view)) {
            Ok(bytes) => hasher.update(&bytes),
            Err(err) => tracing::warn!(%err, "source fields could not be serialized"),
        }
        hasher.finalize().into()
    }
}

/// UI state that is persisted but not part of the content.
trait ViewState {
    fn clear_view_state(&mut self) {}
}

impl ViewState for Skill {}
impl ViewState for Spell {}
impl ViewState for Note {}
impl ViewState for TraitModifier {}
impl ViewState for EquipmentModifier {}

impl ViewState for Trait {
    fn clear_view_state(&mut self) {
        close(&mut self.modifiers);
    }
}

impl ViewState for Equipment {
    fn clear_view_state(&mut self) {
        close(&mut self.modifiers);
    }
}

impl<T: ViewState> ViewState for Node<T> {
    fn clear_view_state(&mut self) {
        self.open = false;
        self.data.clear_view_state();
        close(&mut self.children);
    }
}

fn close<T: ViewState>(nodes: &mut [T]) {
    for node in nodes {
        node.clear_view_state();
    }
}

macro_rules! impl_source_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SourceHash for $ty {
                fn source_view(&self) -> serde_json::Result<Value> {
                    let mut copy = self.clone();
                    copy.clear_view_state();
                    serde_json::to_value(&copy)
                }
            }
        )*
    };
}

impl_source_hash!(
    Trait,
    TraitModifier,
    Skill,
    Spell,
    Equipment,
    EquipmentModifier,
    Note,
    Node<Trait>,
    Node<Skill>,
    Node<Spell>,
    Node<Equipment>,
    Node<Note>,
);

impl SourceHash for Template {
    fn source_view(&self) -> serde_json::Result<Value> {
        let mut copy = self.clone();
        close(&mut copy.traits);
        close(&mut copy.skills);
        close(&mut copy.spells);
        close(&mut copy.equipment);
        close(&mut copy.notes);
        serde_json::to_value(&copy)
    }
}

impl SourceHash for Entity {
    fn source_view(&self) -> serde_json::Result<Value> {
        let mut copy = self.clone();
        close(&mut copy.traits);
        close(&mut copy.skills);
        close(&mut copy.spells);
        close(&mut copy.carried_equipment);
        close(&mut copy.other_equipment);
        close(&mut copy.notes);
        let mut view = serde_json::to_value(&copy)?;
        if let Some(fields) = view.as_object_mut() {
            fields.remove("modified_on");
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxp::Fxp;
    use crate::ids::TidKind;
    use crate::skill::{AttributeDifficulty, Difficulty};
    use crate::traits::TraitContainerType;

    #[test]
    fn transient_skill_fields_are_ignored() {
        let mut skill = Skill::new("Stealth", AttributeDifficulty::new("dx", Difficulty::Average), Fxp::TWO);
        let before = skill.source_hash();
        skill.level.level = Fxp::from_int(12);
        skill.unsatisfied_reason = "nope".into();
        assert_eq!(skill.source_hash(), before);
        skill.points = Fxp::FOUR;
        assert_ne!(skill.source_hash(), before);
    }

    #[test]
    fn open_flag_is_view_state() {
        let mut group = Node::new(TidKind::TraitContainer, Trait::container("Powers", TraitContainerType::Group))
            .with_children(vec![Node::new(TidKind::Trait, Trait::new("Flight", Fxp::from_int(40)))]);
        let before = group.source_hash();
        group.open = true;
        assert_eq!(group.source_hash(), before);
        group.children[0].data.name = "Gliding".into();
        assert_ne!(group.source_hash(), before);
    }

    #[test]
    fn modification_time_is_left_out() {
        let mut entity = Entity::default();
        let before = entity.source_hash();
        entity.modified_on += chrono::Duration::hours(1);
        assert_eq!(entity.source_hash(), before);
        entity.profile.name = "Ada".into();
        assert_ne!(entity.source_hash(), before);
    }

    #[test]
    fn every_persisted_entity_field_is_covered() {
        let entity = Entity::default();
        let view = entity.source_view().unwrap_or_default();
        let persisted = serde_json::to_value(&entity).unwrap_or_default();
        let mut expected: Vec<_> = persisted.as_object().map(|m| m.keys().cloned().collect()).unwrap_or_default();
        expected.retain(|key| key != "modified_on");
        let covered: Vec<_> = view.as_object().map(|m| m.keys().cloned().collect()).unwrap_or_default();
        assert_eq!(covered, expected);
        assert!(!expected.is_empty());
    }
}
