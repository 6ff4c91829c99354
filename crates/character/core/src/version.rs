//! Data file versions.

use crate::error::VersionError;

/// Version written by this engine.
pub const CURRENT_VERSION: u32 = 5;

/// Oldest version that loads without migration.
pub const MINIMUM_VERSION: u32 = 2;

pub fn check_version(version: u32) -> Result<(), VersionError> {
    if version < MINIMUM_VERSION {
        return Err(VersionError::TooOld {
            found: version,
            minimum: MINIMUM_VERSION,
        });
    }
    if version > CURRENT_VERSION {
        return Err(VersionError::TooNew {
            found: version,
            current: CURRENT_VERSION,
        });
    }
    Ok(())
}
