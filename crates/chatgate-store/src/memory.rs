//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence. Writes can be made
//! to fail on demand to exercise error paths in callers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::traits::KvStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Bytes>>,

    /// When set, every write is rejected without touching `inner`.
    fail_writes: AtomicBool,

    /// Number of successful write calls (`put` and `put_batch` each count once).
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful write calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected(
                "memory store is failing writes".into(),
            ));
        }
        Ok(())
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_batch(&self, entries: &[(String, Bytes)]) -> Result<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().map_err(poisoned)?;
        for (key, value) in entries {
            inner.insert(key.clone(), value.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut keys: Vec<String> = inner.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
