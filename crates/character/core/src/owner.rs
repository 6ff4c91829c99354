//! Owners of element forests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::entity::Entity;
use crate::weight::WeightUnit;

/// Maps library names to their root directories so elements copied from a
/// library can be traced back to their source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMatcher {
    roots: BTreeMap<String, PathBuf>,
}

impl SourceMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, library: impl Into<String>, root: impl Into<PathBuf>) {
        self.roots.insert(library.into(), root.into());
    }

    pub fn root(&self, library: &str) -> Option<&Path> {
        self.roots.get(library).map(PathBuf::as_path)
    }

    /// Full path of `relative` inside `library`, if the library is known.
    pub fn resolve(&self, library: &str, relative: &str) -> Option<PathBuf> {
        self.root(library).map(|root| root.join(relative))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Anything that owns element forests: a character or a template.
pub trait DataOwner {
    /// The character, when the owner is one.
    fn owning_entity(&self) -> Option<&Entity>;

    fn source_matcher(&self) -> &SourceMatcher;

    /// Unit used for weights entered without one.
    fn weight_unit(&self) -> WeightUnit;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_libraries_only() {
        let mut matcher = SourceMatcher::new();
        matcher.register("Basic Set", "/libs/basic");
        assert_eq!(
            matcher.resolve("Basic Set", "Skills.skl"),
            Some(PathBuf::from("/libs/basic/Skills.skl"))
        );
        assert_eq!(matcher.resolve("Magic", "Spells.spl"), None);
    }
}
