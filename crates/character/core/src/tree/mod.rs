//! Element forests and the walks over them.

pub mod node;
pub mod traverse;

pub use node::{Node, NodeData, ancestors, find, find_mut, relink};
pub use traverse::{Visit, collect_ids, traverse, traverse_mut};
