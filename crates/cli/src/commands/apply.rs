//! Apply a template to a character.

use std::path::PathBuf;

use anyhow::Result;
use character_content::{ContentFactory, EntityLoader, TemplateLoader};
use clap::Parser;

use crate::dirs;

/// Apply a template to a character file
#[derive(Parser)]
pub struct Apply {
    /// Character file (JSON), rewritten in place unless --output is given
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Template name under the data directory's `templates/`, or a path to
    /// a template file
    #[arg(value_name = "TEMPLATE")]
    template: String,

    /// Data directory holding templates
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Write the result here instead
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

impl Apply {
    pub fn execute(self) -> Result<()> {
        let mut entity = EntityLoader::load(&self.file)?;

        let as_path = PathBuf::from(&self.template);
        let template = if as_path.is_file() {
            TemplateLoader::load(&as_path)?
        } else {
            ContentFactory::new(dirs::data_dir(self.data_dir)).load_template(&self.template)?
        };

        let outcome = template.apply_to(&mut entity);
        if !outcome.converged {
            tracing::warn!(iterations = outcome.iterations, "levels did not settle after applying the template");
        }

        let output = self.output.unwrap_or(self.file);
        EntityLoader::save(&output, &entity)?;
        println!(
            "Applied {} to {} ({} points spent, {} unspent)",
            self.template,
            output.display(),
            entity.spent_points(),
            entity.unspent_points()
        );
        Ok(())
    }
}
