//! Ancestry library loader.

use std::path::Path;

use character_core::{Ancestry, AncestryLibrary};

use crate::loaders::{LoadResult, read_file};

/// Loader for ancestry libraries from RON files.
///
/// Each file holds a list of ancestries:
/// ```ron
/// [
///     (name: "Human"),
///     (
///         name: "Elf",
///         common_options: (hair: [(weight: 3, value: "Blond")]),
///     ),
/// ]
/// ```
pub struct AncestryLoader;

impl AncestryLoader {
    pub fn load(path: &Path) -> LoadResult<AncestryLibrary> {
        let mut library = AncestryLibrary::new();
        Self::load_into(path, &mut library)?;
        Ok(library)
    }

    /// Loads every `.ron` file of `dir` in file-name order. Later files
    /// replace ancestries of the same name.
    pub fn load_dir(dir: &Path) -> LoadResult<AncestryLibrary> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut library = AncestryLibrary::new();
        for path in &paths {
            Self::load_into(path, &mut library)?;
        }
        Ok(library)
    }

    fn load_into(path: &Path, library: &mut AncestryLibrary) -> LoadResult<()> {
        let content = read_file(path)?;
        let ancestries: Vec<Ancestry> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ancestry RON at {}: {}", path.display(), e))?;
        for ancestry in ancestries {
            if ancestry.name.is_empty() {
                tracing::warn!(path = %path.display(), "skipping ancestry without a name");
                continue;
            }
            library.insert(ancestry);
        }
        Ok(())
    }
}
