//! # Chat Gate Store
//!
//! Durable key-value persistence for Chat Gate. The ban store writes its
//! state as a handful of independently keyed values; this crate abstracts
//! where those values live behind the [`KvStore`] trait.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait for all storage operations
//! - [`KvStoreExt`] - Typed get/put on top of raw bytes
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests, with write-failure injection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatgate_store::{KvStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("chatgate.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     store.put("greeting", b"hello".to_vec().into()).await.unwrap();
//!     let value = store.get("greeting").await.unwrap();
//!     assert!(value.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: values are replaced, never patched
//! - **Atomic batches**: [`KvStore::put_batch`] writes every entry or none

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KvStore, KvStoreExt};
