//! Print a character's source-content hash.

use std::path::PathBuf;

use anyhow::Result;
use character_content::EntityLoader;
use character_core::SourceHash;
use clap::Parser;

/// Print the source-content hash of a character file
#[derive(Parser)]
pub struct Hash {
    /// Character file (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl Hash {
    pub fn execute(self) -> Result<()> {
        let entity = EntityLoader::load(&self.file)?;
        println!("{}", hex::encode(entity.source_hash()));
        Ok(())
    }
}
