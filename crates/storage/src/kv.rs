//! Sled-backed blob store
//!
//! Values are kept as raw UTF-8 bytes so the stored document is exactly the
//! string the caller handed over.

use async_trait::async_trait;
use sled::Db;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::port::{self, BlobStore, StoreError};

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes are not valid UTF-8
    #[error("Value under {key} is not valid UTF-8")]
    Encoding {
        /// Key whose value failed to decode
        key: String,
    },
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None flushes after every write)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "palette_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: None,
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Key-value store implementation
pub struct KvStore {
    db: Arc<Db>,
    flush_on_write: bool,
    closed: AtomicBool,
}

impl KvStore {
    /// Create a new key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        // Without an interval there is no background flusher; writes flush inline
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression)
            .flush_every_ms(config.flush_every_ms)
            .open()?;
        tracing::debug!("Opened sled store at {}", config.path);

        Ok(Self {
            db: Arc::new(db),
            flush_on_write: config.flush_every_ms.is_none(),
            closed: AtomicBool::new(false),
        })
    }

    /// Create an in-memory key-value store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;

        Ok(Self {
            db: Arc::new(db),
            flush_on_write: false,
            closed: AtomicBool::new(false),
        })
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| KvError::Encoding {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Set a value by key
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        if self.flush_on_write {
            self.db.flush()?;
        }
        Ok(())
    }

    /// Remove a value by key
    pub fn remove(&self, key: &str) -> Result<bool> {
        let existed = self.db.remove(key.as_bytes())?.is_some();
        if existed && self.flush_on_write {
            self.db.flush()?;
        }
        Ok(existed)
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn ensure_open(&self) -> port::Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for KvStore {
    async fn get(&self, key: &str) -> port::Result<Option<String>> {
        self.ensure_open()?;
        Ok(KvStore::get(self, key)?)
    }

    async fn set(&self, key: &str, value: &str) -> port::Result<()> {
        self.ensure_open()?;
        Ok(KvStore::set(self, key, value)?)
    }

    async fn delete(&self, key: &str) -> port::Result<bool> {
        self.ensure_open()?;
        Ok(self.remove(key)?)
    }

    async fn close(&self) -> port::Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.flush()?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_store_creation() {
        let kv = KvStore::in_memory().unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let kv = KvStore::in_memory().unwrap();

        kv.set("colors-choices", r#"{"modes":{}}"#).unwrap();

        let value = kv.get("colors-choices").unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"modes":{}}"#));
    }

    #[test]
    fn test_get_nonexistent() {
        let kv = KvStore::in_memory().unwrap();
        assert_eq!(kv.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let kv = KvStore::in_memory().unwrap();

        kv.set("key", "first").unwrap();
        kv.set("key", "second").unwrap();

        assert_eq!(kv.get("key").unwrap().as_deref(), Some("second"));
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn test_remove() {
        let kv = KvStore::in_memory().unwrap();

        kv.set("key", "value").unwrap();
        assert!(kv.contains("key").unwrap());

        assert!(kv.remove("key").unwrap());
        assert!(!kv.contains("key").unwrap());

        assert!(!kv.remove("key").unwrap());
    }

    #[test]
    fn test_non_utf8_value_is_reported() {
        let kv = KvStore::in_memory().unwrap();
        kv.db.insert(b"raw", vec![0xff, 0xfe]).unwrap();

        let result = kv.get("raw");
        assert!(matches!(result, Err(KvError::Encoding { .. })));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kv");
        let path = path.to_str().unwrap();

        {
            let kv = KvStore::new(KvConfig::new(path)).unwrap();
            kv.set("key", "value").unwrap();
        }

        let kv = KvStore::new(KvConfig::new(path)).unwrap();
        assert_eq!(kv.get("key").unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_port_roundtrip() {
        let kv = KvStore::in_memory().unwrap();
        let store: &dyn BlobStore = &kv;

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));
        assert!(store.delete("key").await.unwrap());
        assert!(!store.delete("key").await.unwrap());
        assert_eq!(store.backend_name(), "sled");
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let kv = KvStore::in_memory().unwrap();
        let store: &dyn BlobStore = &kv;

        store.close().await.unwrap();
        store.close().await.unwrap();

        assert!(matches!(store.get("key").await, Err(StoreError::Closed)));
        assert!(matches!(store.set("key", "v").await, Err(StoreError::Closed)));
    }

    #[test]
    fn test_config_builder() {
        let config = KvConfig::new("test.db")
            .cache_capacity(32 * 1024 * 1024)
            .use_compression(false)
            .flush_every_ms(Some(1000));

        assert_eq!(config.path, "test.db");
        assert_eq!(config.cache_capacity, 32 * 1024 * 1024);
        assert!(!config.use_compression);
        assert_eq!(config.flush_every_ms, Some(1000));
    }
}
