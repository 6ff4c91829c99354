//! Generic ordered forest node shared by every element kind.

use crate::ids::{Tid, TidKind};

/// Behaviour every element payload supplies to its [`Node`].
pub trait NodeData {
    /// Whether the element is switched on in its own right. Ancestors are not
    /// consulted here; [`crate::tree::traverse`] skips disabled subtrees.
    fn enabled(&self) -> bool {
        true
    }

    /// Drops fields that carry no meaning for the node's shape.
    fn clear_unused_fields(&mut self, _is_container: bool) {}
}

/// A node in one of an owner's element forests.
///
/// Only container nodes (decided by the id's kind byte) hold children or an
/// open flag. The parent id is a non-owning back-reference rebuilt by
/// [`relink`] and never persisted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<T> {
    pub id: Tid,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: T,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node<T>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "core::ops::Not::not"))]
    pub open: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    parent: Option<Tid>,
}

impl<T: NodeData> Node<T> {
    /// Creates a node with a freshly minted id of `kind`.
    pub fn new(kind: TidKind, data: T) -> Self {
        Self::with_id(Tid::new(kind), data)
    }

    pub fn with_id(id: Tid, data: T) -> Self {
        Self {
            id,
            data,
            children: Vec::new(),
            open: false,
            parent: None,
        }
    }

    /// Builder for containers: attaches `children` and links them back.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node<T>>) -> Self {
        self.set_children(children);
        self
    }

    pub fn is_container(&self) -> bool {
        self.id.is_container()
    }

    pub fn kind(&self) -> TidKind {
        self.id.kind()
    }

    pub fn enabled(&self) -> bool {
        self.data.enabled()
    }

    pub fn parent_id(&self) -> Option<&Tid> {
        self.parent.as_ref()
    }

    /// Replaces the child list. Leaves silently refuse children.
    pub fn set_children(&mut self, children: Vec<Node<T>>) {
        if !self.is_container() {
            return;
        }
        self.children = children;
        self.relink();
    }

    /// Re-points every descendant's parent id at its actual parent.
    pub fn relink(&mut self) {
        let id = self.id.clone();
        for child in &mut self.children {
            child.parent = Some(id.clone());
            child.relink();
        }
    }

    pub fn clear_unused_fields(&mut self) {
        let container = self.is_container();
        if !container {
            self.children.clear();
            self.open = false;
        }
        self.data.clear_unused_fields(container);
        for child in &mut self.children {
            child.clear_unused_fields();
        }
    }
}

/// Re-links a whole forest: roots lose their parent, descendants are fixed up.
pub fn relink<T: NodeData>(roots: &mut [Node<T>]) {
    for root in roots {
        root.parent = None;
        root.relink();
    }
}

/// Depth-first search for the node with `id`.
pub fn find<'a, T>(roots: &'a [Node<T>], id: &Tid) -> Option<&'a Node<T>> {
    for node in roots {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a, T>(roots: &'a mut [Node<T>], id: &Tid) -> Option<&'a mut Node<T>> {
    for node in roots {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Parent chain of `id`, nearest first. Requires a linked forest.
pub fn ancestors<'a, T>(roots: &'a [Node<T>], id: &Tid) -> Vec<&'a Node<T>> {
    let mut chain = Vec::new();
    let mut current = find(roots, id).and_then(|n| n.parent.as_ref());
    while let Some(parent_id) = current {
        match find(roots, parent_id) {
            Some(parent) => {
                chain.push(parent);
                current = parent.parent.as_ref();
            }
            None => break,
        }
    }
    chain
}
