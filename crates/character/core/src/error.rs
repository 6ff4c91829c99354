//! Common error infrastructure for character-core.
//!
//! Calculation never fails: recoverable problems (an unresolvable variable, an
//! unknown feature variant) are logged through `tracing` and degrade to a
//! zero or empty value. The error types here cover the few places where
//! continuing would be wrong, such as loading a sheet written by a newer
//! version or missing the default ancestry.

/// How serious an error is, which decides what the caller does next.
///
/// - **Recoverable**: the caller may retry with different input
/// - **Validation**: malformed input that should be rejected
/// - **Internal**: an inconsistency that indicates a bug
/// - **Fatal**: required data is missing and the engine cannot start
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all character-core errors.
///
/// Use `#[derive(thiserror::Error)]` for the `Display`/`Error` impl and classify
/// severity by recoverability.
pub trait SheetError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejection of a data file's version number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("data version {found} is too old; the oldest supported version is {minimum}")]
    TooOld { found: u32, minimum: u32 },

    #[error("data version {found} is newer than this build supports ({current})")]
    TooNew { found: u32, current: u32 },
}

impl SheetError for VersionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooOld { .. } => "VERSION_TOO_OLD",
            Self::TooNew { .. } => "VERSION_TOO_NEW",
        }
    }
}

/// Required reference data is absent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("unable to load default ancestry ({name})")]
    MissingDefaultAncestry { name: String },
}

impl SheetError for DataIntegrityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDefaultAncestry { .. } => "MISSING_DEFAULT_ANCESTRY",
        }
    }
}
