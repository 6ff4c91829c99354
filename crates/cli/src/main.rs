//! Character sheet command-line tool.
//!
//! Run with: `sheet <command>`. Set `RUST_LOG=debug` to see recalculation
//! details on stderr.

mod commands;
mod dirs;
mod report;

use anyhow::Result;
use clap::Parser;
use commands::{Apply, Hash, New, Show};

/// Inspect and edit GURPS character sheets
#[derive(Parser)]
#[command(name = "sheet")]
#[command(about = "Character sheet calculations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Print the computed sheet of a character file
    Show(Show),

    /// Create a blank character from the data directory's settings
    New(New),

    /// Apply a template to a character file
    Apply(Apply),

    /// Print the source-content hash of a character file
    Hash(Hash),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SHEET_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show(cmd) => cmd.execute(),
        Command::New(cmd) => cmd.execute(),
        Command::Apply(cmd) => cmd.execute(),
        Command::Hash(cmd) => cmd.execute(),
    }
}
