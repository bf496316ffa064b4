//! Persistence port
//!
//! Every backend stores opaque string blobs under string keys. Callers above
//! this crate only ever see the [`BlobStore`] trait; which adapter sits behind
//! it is decided once, when the store is opened.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::kv::KvError;

/// Errors surfaced through the persistence port
#[derive(Debug, Error)]
pub enum StoreError {
    /// Sled-backed store failure
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// SQLite-backed store failure
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Backend could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store was used after `close`
    #[error("Store is closed")]
    Closed,
}

/// Result type for port operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key to opaque-string store shared by every palette operation.
///
/// Writes replace the whole value for a key; there is no partial update and no
/// transaction spanning a `get` and a later `set`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Flush and release the backend. Further calls fail with [`StoreError::Closed`].
    async fn close(&self) -> Result<()>;

    /// Short backend name used in log lines
    fn backend_name(&self) -> &'static str;
}
