//! Palette operation surface
//!
//! Each operation loads the stored document, normalizes it, applies one
//! registry call, and writes the projected result back under a single key.
//!
//! There is no lock around the read and the write. Two mutations running at
//! once both read the same document and the later write wins, silently
//! dropping the earlier change. Callers that need stronger guarantees must
//! serialize mutations themselves.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use storage::{BlobStore, StoreError};

use crate::clock::{Clock, SystemClock};
use crate::config::PaletteConfig;
use crate::error::{Missing, PaletteError, PersistenceFailure, Result};
use crate::model::{ColorDraft, ColorEntry, Configuration, ModeCollection};
use crate::reconcile::{normalize, project, validate_document, StoredBlob};
use crate::seed::default_configuration;
use crate::sync::is_built_in;

/// Result of [`PaletteService::initialize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "modes", rename_all = "camelCase")]
pub enum InitOutcome {
    /// Nothing was stored; the default palette was written
    Seeded(BTreeMap<String, usize>),
    /// A configuration already existed and was left alone
    AlreadyPresent(BTreeMap<String, usize>),
}

impl InitOutcome {
    /// Color count per mode
    pub fn summary(&self) -> &BTreeMap<String, usize> {
        match self {
            InitOutcome::Seeded(summary) | InitOutcome::AlreadyPresent(summary) => summary,
        }
    }
}

/// Palette operations over an injected store
pub struct PaletteService {
    store: Arc<dyn BlobStore>,
    config: PaletteConfig,
    clock: Arc<dyn Clock>,
}

impl PaletteService {
    /// Create a service using the default storage key
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            config: PaletteConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a service with explicit settings
    pub fn with_config(store: Arc<dyn BlobStore>, config: PaletteConfig) -> Result<Self> {
        if !config.is_valid() {
            return Err(PaletteError::Validation(format!(
                "Unusable storage key \"{}\"",
                config.storage_key
            )));
        }
        Ok(Self {
            store,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for new color ids
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Active settings
    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    fn store_failure(&self, action: &str, err: StoreError) -> PaletteError {
        tracing::error!(
            "Failed to {} {} on {} store: {}",
            action,
            self.config.storage_key,
            self.store.backend_name(),
            err
        );
        err.into()
    }

    async fn load_raw(&self) -> Result<Option<String>> {
        self.store
            .get(&self.config.storage_key)
            .await
            .map_err(|e| self.store_failure("read", e))
    }

    fn parse(&self, raw: &str) -> Result<StoredBlob> {
        StoredBlob::from_json(raw).map_err(|e| {
            tracing::error!(
                "Stored configuration under {} is corrupt: {}",
                self.config.storage_key,
                e
            );
            PersistenceFailure::Corrupt(e).into()
        })
    }

    async fn load(&self) -> Result<Option<Configuration>> {
        match self.load_raw().await? {
            Some(raw) => Ok(normalize(self.parse(&raw)?)),
            None => Ok(None),
        }
    }

    async fn require(&self) -> Result<Configuration> {
        self.load()
            .await?
            .ok_or(PaletteError::NotFound(Missing::Configuration))
    }

    async fn persist(&self, config: &Configuration) -> Result<()> {
        let json = project(config).to_json().map_err(|e| {
            tracing::error!("Failed to encode configuration: {}", e);
            PersistenceFailure::Encode(e)
        })?;
        self.store
            .set(&self.config.storage_key, &json)
            .await
            .map_err(|e| self.store_failure("write", e))
    }

    async fn mutate<T, F>(&self, config: Option<Configuration>, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Configuration) -> Result<T> + Send,
    {
        let mut config = match config {
            Some(config) => config,
            None => self.require().await?,
        };
        let output = apply(&mut config)?;
        self.persist(&config).await?;
        Ok(output)
    }

    /// The stored configuration in dual shape
    pub async fn read_configuration(&self) -> Result<StoredBlob> {
        let config = self.require().await?;
        Ok(project(&config))
    }

    /// Replace the whole configuration with a caller-supplied document in
    /// either shape
    pub async fn replace_configuration(&self, document: Value) -> Result<()> {
        let config = validate_document(document)?;
        self.persist(&config).await?;
        tracing::info!("Replaced configuration ({} colors)", config.color_count());
        Ok(())
    }

    /// Remove the stored configuration
    pub async fn delete_configuration(&self) -> Result<()> {
        let existed = self
            .store
            .delete(&self.config.storage_key)
            .await
            .map_err(|e| self.store_failure("delete", e))?;
        if !existed {
            return Err(PaletteError::NotFound(Missing::Configuration));
        }
        tracing::info!("Deleted configuration {}", self.config.storage_key);
        Ok(())
    }

    /// Every mode by name
    pub async fn list_modes(&self) -> Result<BTreeMap<String, ModeCollection>> {
        let config = self.require().await?;
        Ok(config.list_modes().clone())
    }

    /// One mode
    pub async fn get_mode(&self, name: &str) -> Result<ModeCollection> {
        let config = self.require().await?;
        config.get_mode(name).cloned()
    }

    /// Create a mode, starting a fresh configuration if none is stored.
    /// Returns the sanitized name.
    pub async fn create_mode(&self, requested: &str, initial: Vec<ColorEntry>) -> Result<String> {
        let config = self.load().await?.unwrap_or_default();
        let clock = self.clock.as_ref();
        self.mutate(Some(config), |c| c.create_mode(requested, initial, clock))
            .await
    }

    /// Rename a custom mode. Returns the sanitized new name.
    pub async fn rename_mode(&self, old_name: &str, new_name: &str) -> Result<String> {
        self.mutate(None, |c| c.rename_mode(old_name, new_name))
            .await
    }

    /// Delete a custom mode
    pub async fn delete_mode(&self, name: &str) -> Result<ModeCollection> {
        if is_built_in(name) {
            return Err(PaletteError::Forbidden(format!("Cannot delete built-in mode \"{name}\"")));
        }
        self.mutate(None, |c| c.delete_mode(name)).await
    }

    /// Replace every color of a mode
    pub async fn replace_mode_colors(
        &self,
        name: &str,
        colors: Vec<ColorEntry>,
    ) -> Result<ModeCollection> {
        let clock = self.clock.as_ref();
        self.mutate(None, |c| {
            c.replace_mode_colors(name, colors, clock).cloned()
        })
        .await
    }

    /// Append a color to a mode
    pub async fn add_color(&self, mode_name: &str, draft: ColorDraft) -> Result<ColorEntry> {
        let clock = self.clock.as_ref();
        self.mutate(None, |c| c.add_color(mode_name, draft, clock))
            .await
    }

    /// Replace a color's fields, keeping its id
    pub async fn update_color(&self, id: &str, draft: ColorDraft) -> Result<ColorEntry> {
        self.mutate(None, |c| c.update_color(id, draft)).await
    }

    /// Remove a color
    pub async fn delete_color(&self, id: &str) -> Result<ColorEntry> {
        self.mutate(None, |c| c.delete_color(id)).await
    }

    /// Seed the default palette unless something is already stored.
    ///
    /// Any stored value blocks seeding, including documents that read as
    /// absent because they carry neither `modes` nor both legacy fields.
    pub async fn initialize(&self) -> Result<InitOutcome> {
        if let Some(raw) = self.load_raw().await? {
            let summary = normalize(self.parse(&raw)?)
                .map(|existing| existing.summary())
                .unwrap_or_default();
            tracing::info!("Configuration already present; leaving it untouched");
            return Ok(InitOutcome::AlreadyPresent(summary));
        }

        let config = default_configuration();
        self.persist(&config).await?;
        tracing::info!("Seeded default palette ({} colors)", config.color_count());
        Ok(InitOutcome::Seeded(config.summary()))
    }

    /// Close the underlying store
    pub async fn close(&self) -> Result<()> {
        self.store
            .close()
            .await
            .map_err(|e| self.store_failure("close", e))
    }
}
