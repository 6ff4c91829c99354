//! Loaders for reading character data from files.

pub mod ancestry;
pub mod entity;
pub mod factory;
pub mod settings;
pub mod template;

pub use ancestry::AncestryLoader;
pub use entity::EntityLoader;
pub use factory::ContentFactory;
pub use settings::{Settings, SettingsLoader};
pub use template::TemplateLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

pub(crate) fn write_file(path: &Path, content: &str) -> LoadResult<()> {
    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
}
