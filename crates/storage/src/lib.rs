//! Storage layer for Palette Keeper
//!
//! This crate provides the persistence port the palette engine writes
//! through, plus sled, SQLite, and in-memory adapters for it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod database;
pub mod kv;
pub mod memory;
pub mod port;

pub use backend::{BackendKind, StorageBackend};
pub use database::{DatabaseConfig, DatabaseError, SqliteStore, SynchronousMode};
pub use kv::{KvConfig, KvError, KvStore};
pub use memory::MemoryStore;
pub use port::{BlobStore, StoreError};
