//! Depth-first, pre-order walks over element forests.

use bitflags::bitflags;

use crate::ids::Tid;

use super::node::{Node, NodeData};

bitflags! {
    /// Filters applied while walking a forest.
    ///
    /// `ONLY_ENABLED` skips a disabled node together with its entire subtree.
    /// `EXCLUDE_CONTAINERS` withholds container nodes from the visitor but still
    /// descends into their children.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Visit: u8 {
        const ONLY_ENABLED       = 1 << 0;
        const EXCLUDE_CONTAINERS = 1 << 1;
    }
}

impl Visit {
    /// Enabled leaves only.
    pub const ENABLED_LEAVES: Self = Self::ONLY_ENABLED.union(Self::EXCLUDE_CONTAINERS);
}

/// Walks `roots` depth-first. The visitor returns `true` to stop the whole
/// walk, in which case this returns `true` as well.
pub fn traverse<'a, T, F>(flags: Visit, roots: &'a [Node<T>], mut visit: F) -> bool
where
    T: NodeData,
    F: FnMut(&'a Node<T>) -> bool,
{
    walk(flags, roots, &mut visit)
}

fn walk<'a, T, F>(flags: Visit, nodes: &'a [Node<T>], visit: &mut F) -> bool
where
    T: NodeData,
    F: FnMut(&'a Node<T>) -> bool,
{
    for node in nodes {
        if flags.contains(Visit::ONLY_ENABLED) && !node.enabled() {
            continue;
        }
        let container = node.is_container();
        if (!container || !flags.contains(Visit::EXCLUDE_CONTAINERS)) && visit(node) {
            return true;
        }
        if container && walk(flags, &node.children, visit) {
            return true;
        }
    }
    false
}

/// Mutable walk. The visitor may rewrite the node it is handed, including
/// its child list; descent follows the children present once it returns.
pub fn traverse_mut<T, F>(flags: Visit, roots: &mut [Node<T>], mut visit: F) -> bool
where
    T: NodeData,
    F: FnMut(&mut Node<T>) -> bool,
{
    walk_mut(flags, roots, &mut visit)
}

fn walk_mut<T, F>(flags: Visit, nodes: &mut [Node<T>], visit: &mut F) -> bool
where
    T: NodeData,
    F: FnMut(&mut Node<T>) -> bool,
{
    for node in nodes {
        if flags.contains(Visit::ONLY_ENABLED) && !node.enabled() {
            continue;
        }
        let container = node.is_container();
        if (!container || !flags.contains(Visit::EXCLUDE_CONTAINERS)) && visit(node) {
            return true;
        }
        if container && walk_mut(flags, &mut node.children, visit) {
            return true;
        }
    }
    false
}

/// Ids of every node the walk would visit, in visiting order.
pub fn collect_ids<T: NodeData>(flags: Visit, roots: &[Node<T>]) -> Vec<Tid> {
    let mut ids = Vec::new();
    traverse(flags, roots, |node| {
        ids.push(node.id.clone());
        false
    });
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TidKind;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        name: &'static str,
        on: bool,
    }

    impl NodeData for Item {
        fn enabled(&self) -> bool {
            self.on
        }
    }

    fn leaf(name: &'static str, on: bool) -> Node<Item> {
        Node::new(TidKind::Trait, Item { name, on })
    }

    fn group(name: &'static str, on: bool, children: Vec<Node<Item>>) -> Node<Item> {
        Node::new(TidKind::TraitContainer, Item { name, on }).with_children(children)
    }

    fn forest() -> Vec<Node<Item>> {
        vec![
            group("g1", true, vec![leaf("a", true), leaf("b", false)]),
            group("g2", false, vec![leaf("c", true)]),
            leaf("d", true),
        ]
    }

    fn names(flags: Visit, roots: &[Node<Item>]) -> Vec<&'static str> {
        let mut out = Vec::new();
        traverse(flags, roots, |n| {
            out.push(n.data.name);
            false
        });
        out
    }

    #[test]
    fn visits_pre_order_without_flags() {
        assert_eq!(names(Visit::empty(), &forest()), vec!["g1", "a", "b", "g2", "c", "d"]);
    }

    #[test]
    fn only_enabled_prunes_disabled_subtrees() {
        // g2 is disabled, so its enabled child c is never seen
        assert_eq!(names(Visit::ONLY_ENABLED, &forest()), vec!["g1", "a", "d"]);
    }

    #[test]
    fn exclude_containers_still_descends() {
        assert_eq!(names(Visit::EXCLUDE_CONTAINERS, &forest()), vec!["a", "b", "c", "d"]);
        assert_eq!(names(Visit::ENABLED_LEAVES, &forest()), vec!["a", "d"]);
    }

    #[test]
    fn stop_flag_aborts_entire_walk() {
        let mut seen = Vec::new();
        let stopped = traverse(Visit::empty(), &forest(), |n| {
            seen.push(n.data.name);
            n.data.name == "a"
        });
        assert!(stopped);
        assert_eq!(seen, vec!["g1", "a"]);
    }

    #[test]
    fn mutable_walk_descends_into_replaced_children() {
        let mut roots = forest();
        traverse_mut(Visit::empty(), &mut roots, |n| {
            if n.data.name == "g2" {
                n.set_children(vec![leaf("fresh", true)]);
            }
            false
        });
        assert_eq!(names(Visit::empty(), &roots), vec!["g1", "a", "b", "g2", "fresh", "d"]);
    }

    #[test]
    fn collects_ids_in_visit_order() {
        let roots = forest();
        let ids = collect_ids(Visit::ENABLED_LEAVES, &roots);
        assert_eq!(ids, vec![roots[0].children[0].id.clone(), roots[2].id.clone()]);
    }
}
