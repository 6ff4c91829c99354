//! Templates: element forests that can be stamped onto a character.

use crate::entity::{Entity, RecalcOutcome};
use crate::equipment::Equipment;
use crate::ids::{Tid, TidKind};
use crate::note::Note;
use crate::owner::{DataOwner, SourceMatcher};
use crate::skill::Skill;
use crate::spell::Spell;
use crate::traits::Trait;
use crate::tree::{Node, NodeData, relink};
use crate::weight::WeightUnit;

/// A character template. Owns elements but has no character of its own, so
/// nothing inside it is ever recalculated.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Template {
    pub id: Tid,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub traits: Vec<Node<Trait>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub skills: Vec<Node<Skill>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub spells: Vec<Node<Spell>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub equipment: Vec<Node<Equipment>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub notes: Vec<Node<Note>>,
    pub weight_unit: WeightUnit,
    #[cfg_attr(feature = "serde", serde(skip))]
    source_matcher: SourceMatcher,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            id: Tid::new(TidKind::Template),
            traits: Vec::new(),
            skills: Vec::new(),
            spells: Vec::new(),
            equipment: Vec::new(),
            notes: Vec::new(),
            weight_unit: WeightUnit::default(),
            source_matcher: SourceMatcher::new(),
        }
    }
}

/// Deep copy with every node given a new id of the same kind.
fn with_fresh_ids<T: NodeData + Clone>(nodes: &[Node<T>]) -> Vec<Node<T>> {
    nodes
        .iter()
        .map(|node| {
            let mut copy = Node::with_id(Tid::new(node.kind()), node.data.clone());
            copy.open = node.open;
            copy.with_children(with_fresh_ids(&node.children))
        })
        .collect()
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relink(&mut self) {
        relink(&mut self.traits);
        relink(&mut self.skills);
        relink(&mut self.spells);
        relink(&mut self.equipment);
        relink(&mut self.notes);
    }

    pub fn source_matcher_mut(&mut self) -> &mut SourceMatcher {
        &mut self.source_matcher
    }

    /// Appends copies of every element to `entity` and recalculates it.
    /// Equipment goes to the carried list.
    pub fn apply_to(&self, entity: &mut Entity) -> RecalcOutcome {
        entity.traits.extend(with_fresh_ids(&self.traits));
        entity.skills.extend(with_fresh_ids(&self.skills));
        entity.spells.extend(with_fresh_ids(&self.spells));
        entity.carried_equipment.extend(with_fresh_ids(&self.equipment));
        entity.notes.extend(with_fresh_ids(&self.notes));
        tracing::debug!(template = %self.id, entity = %entity.id, "applied template");
        entity.touch();
        entity.recalculate()
    }
}

impl DataOwner for Template {
    fn owning_entity(&self) -> Option<&Entity> {
        None
    }

    fn source_matcher(&self) -> &SourceMatcher {
        &self.source_matcher
    }

    fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxp::Fxp;
    use crate::skill::{AttributeDifficulty, Difficulty};
    use crate::traits::TraitContainerType;

    #[test]
    fn applying_copies_with_new_ids() {
        let mut template = Template::new();
        template.traits.push(
            Node::new(TidKind::TraitContainer, Trait::container("Soldier", TraitContainerType::Group))
                .with_children(vec![Node::new(TidKind::Trait, Trait::new("Fit", Fxp::FIVE))]),
        );
        template.skills.push(Node::new(
            TidKind::Skill,
            Skill::new("Soldier", AttributeDifficulty::new("iq", Difficulty::Average), Fxp::TWO),
        ));
        assert!(template.owning_entity().is_none());

        let mut entity = Entity::default();
        let outcome = template.apply_to(&mut entity);
        assert!(outcome.converged);
        assert_eq!(entity.traits.len(), 1);
        assert_ne!(entity.traits[0].id, template.traits[0].id);
        assert_eq!(entity.traits[0].children[0].parent_id(), Some(&entity.traits[0].id));
        assert_eq!(entity.skills[0].data.level.level, Fxp::TEN);
    }
}
