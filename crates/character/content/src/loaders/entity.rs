//! Character sheet loader.

use std::path::Path;

use character_core::{CURRENT_VERSION, Entity, check_version};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file, write_file};

/// Just enough of a sheet to reject unsupported versions before the full
/// parse.
#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: u32,
}

/// Loader for character sheets stored as JSON.
pub struct EntityLoader;

impl EntityLoader {
    /// Load a character from a JSON file and recalculate it.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not a sheet, or carries a
    /// version outside the supported range.
    pub fn load(path: &Path) -> LoadResult<Entity> {
        let content = read_file(path)?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn from_json(content: &str) -> LoadResult<Entity> {
        let probe: VersionProbe = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sheet JSON: {}", e))?;
        check_version(probe.version)?;

        let mut entity: Entity = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sheet JSON: {}", e))?;
        let outcome = entity.prepare_after_load();
        tracing::debug!(
            entity = %entity.id,
            version = probe.version,
            iterations = outcome.iterations,
            "loaded sheet"
        );
        Ok(entity)
    }

    /// Save a character as pretty-printed JSON at the current version.
    pub fn save(path: &Path, entity: &Entity) -> LoadResult<()> {
        write_file(path, &Self::to_json(entity)?)
    }

    pub fn to_json(entity: &Entity) -> LoadResult<String> {
        let mut value = serde_json::to_value(entity)
            .map_err(|e| anyhow::anyhow!("Failed to serialize sheet: {}", e))?;
        value["version"] = CURRENT_VERSION.into();
        serde_json::to_string_pretty(&value).map_err(|e| anyhow::anyhow!("Failed to serialize sheet: {}", e))
    }
}
