//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable naming the data directory.
pub const DATA_DIR_VAR: &str = "SHEET_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./data";

/// The data directory: the explicit argument, then `$SHEET_DATA_DIR`, then
/// `./data`.
pub fn data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DATA_DIR_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
