//! Palette service configuration

/// Key holding the palette document
pub const DEFAULT_STORAGE_KEY: &str = "colors-choices";

/// Key reserved for the editing password. Nothing in this crate reads it;
/// it is listed so the palette key is never configured to collide with it.
pub const SECRET_KEY: &str = "color-feature-password";

/// Settings for [`PaletteService`](crate::service::PaletteService)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    /// Store key holding the palette document
    pub storage_key: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl PaletteConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Whether the storage key is usable
    pub fn is_valid(&self) -> bool {
        !self.storage_key.trim().is_empty() && self.storage_key != SECRET_KEY
    }
}
