//! Print a character's computed sheet.

use std::path::PathBuf;

use anyhow::Result;
use character_content::{ContentFactory, EntityLoader};
use clap::Parser;

use crate::{dirs, report};

/// Print the computed sheet of a character file
#[derive(Parser)]
pub struct Show {
    /// Character file (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Data directory holding settings and ancestries
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Attributes, derived values, skills and reactions
    Summary,
    /// The saved form of the character
    Json,
}

impl Show {
    pub fn execute(self) -> Result<()> {
        let entity = EntityLoader::load(&self.file)?;

        match self.format {
            OutputFormat::Summary => {
                let factory = ContentFactory::new(dirs::data_dir(self.data_dir));
                let settings = factory.load_settings()?;
                let ancestries = factory.load_ancestries()?;
                let ancestry = match entity.ancestry(&ancestries, &settings.general) {
                    Ok(ancestry) => Some(ancestry.name.clone()),
                    Err(err) => {
                        tracing::warn!("{}", err);
                        None
                    }
                };
                print!("{}", report::summary(&entity, ancestry.as_deref()));
            }
            OutputFormat::Json => println!("{}", EntityLoader::to_json(&entity)?),
        }
        Ok(())
    }
}
