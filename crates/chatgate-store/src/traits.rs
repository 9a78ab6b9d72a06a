//! KvStore trait: the abstract interface for durable key-value persistence.
//!
//! This trait keeps the ban store storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use chatgate_core::{decode_value, encode_value};

use crate::error::Result;

/// Async interface for key-value persistence.
///
/// All methods are async to support both blocking (SQLite) and async
/// backends. For SQLite, `spawn_blocking` is used internally.
///
/// # Design Notes
///
/// - **Missing keys**: `get` returns `Ok(None)`, never an error.
/// - **Durability**: a successful `put` or `put_batch` means the value is
///   stored; callers commit dependent in-memory state only afterwards.
/// - **Atomic batches**: `put_batch` either stores every entry or none.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Load the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Replace the value stored under `key`.
    async fn put(&self, key: &str, value: Bytes) -> Result<()>;

    /// Replace several values in one atomic write.
    async fn put_batch(&self, entries: &[(String, Bytes)]) -> Result<()>;

    /// List all stored keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn put_batch(&self, entries: &[(String, Bytes)]) -> Result<()> {
        (**self).put_batch(entries).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}

/// Extension trait for typed values.
pub trait KvStoreExt: KvStore {
    /// Load and decode the value under `key`.
    fn get_decoded<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<T>>> + Send;

    /// Encode and store `value` under `key`.
    fn put_encoded<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    async fn get_decoded<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(decode_value(key, &bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_encoded<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = encode_value(value)?;
        self.put(key, bytes).await
    }
}
