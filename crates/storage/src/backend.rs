//! Backend selection
//!
//! Turns a configuration value into an opened [`BlobStore`]. The caller owns
//! the returned handle and is responsible for closing it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::database::{DatabaseConfig, SqliteStore};
use crate::kv::{KvConfig, KvStore};
use crate::memory::MemoryStore;
use crate::port::{BlobStore, Result, StoreError};

/// Which adapter to open
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Sled database directory
    Sled(KvConfig),
    /// SQLite database file
    Sqlite(DatabaseConfig),
    /// Process-local map
    Memory,
}

impl StorageBackend {
    /// Build a backend of `kind` rooted at `path`
    pub fn from_kind(kind: BackendKind, path: impl Into<String>) -> Self {
        match kind {
            BackendKind::Sled => StorageBackend::Sled(KvConfig::new(path)),
            BackendKind::Sqlite => StorageBackend::Sqlite(DatabaseConfig::new(path)),
            BackendKind::Memory => StorageBackend::Memory,
        }
    }

    /// Open the configured store
    pub async fn open(self) -> Result<Arc<dyn BlobStore>> {
        let store: Arc<dyn BlobStore> = match self {
            StorageBackend::Sled(config) => Arc::new(KvStore::new(config)?),
            StorageBackend::Sqlite(config) => Arc::new(SqliteStore::new(config).await?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        tracing::debug!("Opened {} backend", store.backend_name());
        Ok(store)
    }
}

/// Backend names accepted from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// See [`StorageBackend::Sled`]
    Sled,
    /// See [`StorageBackend::Sqlite`]
    Sqlite,
    /// See [`StorageBackend::Memory`]
    Memory,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sled" | "kv" => Ok(BackendKind::Sled),
            "sqlite" | "sql" => Ok(BackendKind::Sqlite),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(StoreError::Config(format!("Unknown storage backend: {other}"))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Sled => "sled",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Memory => "memory",
        };
        f.write_str(name)
    }
}
