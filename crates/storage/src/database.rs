//! SQLite-backed blob store
//!
//! Blobs live in a single `kv_store` table keyed by text. The schema is
//! created through versioned migrations recorded in `_migrations`.

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Error as SqlxError, SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::port::{self, BlobStore, StoreError};

/// Database error types
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file path
    pub path: String,
    /// Maximum number of connections in pool
    pub max_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Enable WAL mode
    pub wal_mode: bool,
    /// Synchronous mode
    pub synchronous: SynchronousMode,
}

/// SQLite synchronous mode
#[derive(Debug, Clone, Copy)]
pub enum SynchronousMode {
    /// Off - no synchronization
    Off,
    /// Normal - synchronize at critical moments
    Normal,
    /// Full - synchronize after each write
    Full,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "palette.db".to_string(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(30),
            wal_mode: true,
            synchronous: SynchronousMode::Normal,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable WAL mode
    pub fn wal_mode(mut self, enabled: bool) -> Self {
        self.wal_mode = enabled;
        self
    }

    /// Set synchronous mode
    pub fn synchronous(mut self, mode: SynchronousMode) -> Self {
        self.synchronous = mode;
        self
    }
}

/// Migrations that build the blob table
pub fn kv_store_migrations() -> Vec<MigrationDefinition> {
    vec![MigrationDefinition::new(
        1,
        "Create kv_store",
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )]
}

/// SQLite store implementation
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file and bring the schema up to date
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path))
            .map_err(|e| DatabaseError::Config(e.to_string()))?
            .create_if_missing(true);

        if config.wal_mode {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        options = match config.synchronous {
            SynchronousMode::Off => options.synchronous(SqliteSynchronous::Off),
            SynchronousMode::Normal => options.synchronous(SqliteSynchronous::Normal),
            SynchronousMode::Full => options.synchronous(SqliteSynchronous::Full),
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate(&kv_store_migrations()).await?;
        tracing::debug!("Opened SQLite store at {}", config.path);

        Ok(store)
    }

    /// Create an in-memory database (for testing)
    ///
    /// A single connection that never expires keeps the memory database alive
    /// for the lifetime of the store.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate(&kv_store_migrations()).await?;
        Ok(store)
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run migrations
    pub async fn migrate(&self, migrations: &[MigrationDefinition]) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        for migration in migrations {
            let recorded: Option<String> =
                sqlx::query_scalar("SELECT checksum FROM _migrations WHERE version = ?")
                    .bind(migration.version)
                    .fetch_optional(&self.pool)
                    .await?;

            match recorded {
                Some(checksum) if checksum == migration.checksum => continue,
                Some(checksum) => {
                    return Err(DatabaseError::Migration(format!(
                        "Migration {} was applied with checksum {}, expected {}",
                        migration.version, checksum, migration.checksum
                    )));
                }
                None => {}
            }

            tracing::info!(
                "Applying migration {} - {}",
                migration.version,
                migration.description
            );

            let mut tx = self.pool.begin().await?;

            sqlx::query(&migration.sql).execute(&mut *tx).await?;

            sqlx::query(
                "INSERT INTO _migrations (version, description, checksum) VALUES (?, ?, ?)",
            )
            .bind(migration.version)
            .bind(&migration.description)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            tracing::info!("Migration {} applied successfully", migration.version);
        }

        Ok(())
    }

    /// Get current migration version
    pub async fn current_version(&self) -> Result<i64> {
        let version = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM _migrations")
            .fetch_optional(&self.pool)
            .await?
            .flatten();

        Ok(version.unwrap_or(0))
    }

    /// Check if the database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    fn ensure_open(&self) -> port::Result<()> {
        if self.pool.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn get(&self, key: &str) -> port::Result<Option<String>> {
        self.ensure_open()?;
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> port::Result<()> {
        self.ensure_open()?;
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> port::Result<bool> {
        self.ensure_open()?;
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) -> port::Result<()> {
        self.pool.close().await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// Migration definition
#[derive(Debug, Clone)]
pub struct MigrationDefinition {
    /// Migration version number
    pub version: i64,
    /// Migration description
    pub description: String,
    /// SQL to execute
    pub sql: String,
    /// Checksum for verification
    pub checksum: String,
}

impl MigrationDefinition {
    /// Create a new migration definition
    pub fn new(
        version: i64,
        description: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        let sql = sql.into();
        let checksum = format!("{:x}", md5::compute(&sql));

        Self {
            version,
            description: description.into(),
            sql,
            checksum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let db = SqliteStore::in_memory().await.unwrap();
        assert!(db.health_check().await.is_ok());
        assert_eq!(db.current_version().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let db = SqliteStore::in_memory().await.unwrap();

        db.set("colors-choices", r#"{"modes":{}}"#).await.unwrap();

        let value = db.get("colors-choices").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"modes":{}}"#));
    }

    #[tokio::test]
    async fn test_set_replaces_existing() {
        let db = SqliteStore::in_memory().await.unwrap();

        db.set("key", "first").await.unwrap();
        db.set("key", "second").await.unwrap();

        assert_eq!(db.get("key").await.unwrap().as_deref(), Some("second"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = SqliteStore::in_memory().await.unwrap();

        db.set("key", "value").await.unwrap();
        assert!(db.delete("key").await.unwrap());
        assert!(!db.delete("key").await.unwrap());
        assert_eq!(db.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let db = SqliteStore::in_memory().await.unwrap();

        db.migrate(&kv_store_migrations()).await.unwrap();
        db.migrate(&kv_store_migrations()).await.unwrap();

        assert_eq!(db.current_version().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_migration_checksum_mismatch() {
        let db = SqliteStore::in_memory().await.unwrap();

        let tampered = vec![MigrationDefinition::new(
            1,
            "Create kv_store",
            "CREATE TABLE IF NOT EXISTS other (id INTEGER)",
        )];

        let result = db.migrate(&tampered).await;
        assert!(matches!(result, Err(DatabaseError::Migration(_))));
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("palette.db");
        let path = path.to_str().unwrap().to_string();

        {
            let db = SqliteStore::new(DatabaseConfig::new(&path)).await.unwrap();
            db.set("key", "value").await.unwrap();
            db.close().await.unwrap();
        }

        let db = SqliteStore::new(DatabaseConfig::new(&path)).await.unwrap();
        assert_eq!(db.get("key").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let db = SqliteStore::in_memory().await.unwrap();
        db.close().await.unwrap();

        assert!(matches!(db.get("key").await, Err(StoreError::Closed)));
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DatabaseConfig::new("test.db")
            .max_connections(5)
            .connect_timeout(Duration::from_secs(10))
            .wal_mode(true)
            .synchronous(SynchronousMode::Full);

        assert_eq!(config.path, "test.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.wal_mode);
        assert!(matches!(config.synchronous, SynchronousMode::Full));
    }
}
