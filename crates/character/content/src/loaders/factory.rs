//! Content factory for loading everything from a data directory.

use std::path::{Path, PathBuf};

use character_core::{AncestryLibrary, Entity, Template};

use crate::loaders::{AncestryLoader, EntityLoader, LoadResult, Settings, SettingsLoader, TemplateLoader};

/// Loads reference data from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── settings.toml
/// ├── ancestries/
/// │   └── standard.ron
/// └── templates/
///     └── soldier.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Settings from `settings.toml`; defaults when the file is absent.
    pub fn load_settings(&self) -> LoadResult<Settings> {
        SettingsLoader::load_or_default(&self.data_dir.join("settings.toml"))
    }

    /// Every ancestry under `ancestries/`; empty when the directory is absent.
    pub fn load_ancestries(&self) -> LoadResult<AncestryLibrary> {
        let dir = self.data_dir.join("ancestries");
        if !dir.is_dir() {
            return Ok(AncestryLibrary::new());
        }
        AncestryLoader::load_dir(&dir)
    }

    /// Template `templates/<name>.json`.
    pub fn load_template(&self, name: &str) -> LoadResult<Template> {
        TemplateLoader::load(&self.data_dir.join("templates").join(format!("{name}.json")))
    }

    /// A blank character built from the loaded settings.
    pub fn new_entity(&self) -> LoadResult<Entity> {
        let settings = self.load_settings()?;
        let mut entity = Entity::new(settings.sheet, &settings.general);
        entity.recalculate();
        Ok(entity)
    }
}
