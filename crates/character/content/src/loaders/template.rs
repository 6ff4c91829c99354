//! Template loader.

use std::path::Path;

use character_core::Template;

use crate::loaders::{LoadResult, read_file};

/// Loader for character templates stored as JSON.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load(path: &Path) -> LoadResult<Template> {
        let content = read_file(path)?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn from_json(content: &str) -> LoadResult<Template> {
        let mut template: Template = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template JSON: {}", e))?;
        template.relink();
        Ok(template)
    }
}
