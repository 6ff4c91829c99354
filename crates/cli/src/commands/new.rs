//! Create a blank character.

use std::path::PathBuf;

use anyhow::Result;
use character_content::{ContentFactory, EntityLoader};
use clap::Parser;

use crate::dirs;

/// Create a blank character from the data directory's settings
#[derive(Parser)]
pub struct New {
    /// Where to write the character file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Character name
    #[arg(short, long)]
    name: Option<String>,

    /// Data directory holding settings
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl New {
    pub fn execute(self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!("{} already exists (use --force to overwrite)", self.output.display());
        }

        let factory = ContentFactory::new(dirs::data_dir(self.data_dir));
        let mut entity = factory.new_entity()?;
        if let Some(name) = self.name {
            entity.profile.name = name;
        }
        EntityLoader::save(&self.output, &entity)?;

        println!("Created {} ({} points)", self.output.display(), entity.total_points);
        Ok(())
    }
}
