//! Palette error taxonomy
//!
//! Each failure is scoped to the single operation that raised it.

use std::fmt;
use storage::StoreError;
use thiserror::Error;

/// What a `NotFound` failure was looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// No configuration is stored
    Configuration,
    /// Named mode is absent
    Mode(String),
    /// Color id is absent
    Color(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Configuration => f.write_str("no colors configuration is stored"),
            Missing::Mode(name) => write!(f, "mode \"{name}\""),
            Missing::Color(id) => write!(f, "color \"{id}\""),
        }
    }
}

/// Why the persistence layer failed
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    /// Store refused a read or write
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored document is not a readable configuration
    #[error("stored configuration is corrupt: {0}")]
    Corrupt(serde_json::Error),

    /// Configuration could not be encoded for storage
    #[error("configuration could not be encoded: {0}")]
    Encode(serde_json::Error),
}

/// Palette operation errors
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Configuration, mode, or color absent
    #[error("Not found: {0}")]
    NotFound(Missing),

    /// Name or id already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation would remove or restructure a built-in mode
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed color, mode name, or configuration shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying store failed
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceFailure),
}

impl From<StoreError> for PaletteError {
    fn from(err: StoreError) -> Self {
        PaletteError::Persistence(PersistenceFailure::Store(err))
    }
}

impl PaletteError {
    pub(crate) fn mode_not_found(name: &str) -> Self {
        PaletteError::NotFound(Missing::Mode(name.to_string()))
    }

    pub(crate) fn color_not_found(id: &str) -> Self {
        PaletteError::NotFound(Missing::Color(id.to_string()))
    }

    /// Whether this is any kind of `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, PaletteError::NotFound(_))
    }
}

/// Result type for palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;
