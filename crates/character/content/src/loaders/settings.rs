//! Settings loader.

use std::path::Path;

use character_core::{GeneralSettings, SheetSettings};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Settings file layout. Both tables are optional.
///
/// ```toml
/// [general]
/// initial_points = 250
/// default_ancestry = "Human"
///
/// [sheet]
/// damage_progression = "knowing_your_own_strength"
/// default_weight_unit = "kg"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub sheet: SheetSettings,
}

/// Loader for settings from TOML files.
pub struct SettingsLoader;

impl SettingsLoader {
    pub fn load(path: &Path) -> LoadResult<Settings> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> LoadResult<Settings> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))
    }

    /// Like [`SettingsLoader::load`], but a missing file gives the defaults.
    pub fn load_or_default(path: &Path) -> LoadResult<Settings> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Self::load(path)
    }
}
