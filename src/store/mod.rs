// Copyright (c) 2025 - Cowboy AI, Inc.
//! Variable Store
//!
//! The cloud automation service keeps everything as string values under
//! string keys. The engine uses three key families:
//!
//! - `instance:<entity id>` - serialized automation [`Model`](crate::model::Model)
//! - `mixin:<title>` - serialized [`MixinDefinition`](crate::domain::MixinDefinition)
//! - `mixin-index` - serialized [`MixinIndex`](crate::domain::MixinIndex)
//!
//! [`InMemoryStore`] backs tests and the CLI; [`HttpVariableStore`] talks to
//! the automation service's variables endpoint (feature `http`).

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpVariableStore;

use indexmap::IndexMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

/// Errors reported by a variable store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Remote store answered with a non-success status
    #[error("Store returned status {code}: {reason}")]
    Status { code: u16, reason: String },

    /// Store could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key already holds a value
    #[error("Key already exists: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Synchronous key/value store of string variables
pub trait VariableStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<String>;

    /// Create a new key
    fn post(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Replace the value of an existing key
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    fn delete(&self, key: &str) -> StoreResult<()>;

    fn keys(&self) -> StoreResult<Vec<String>>;

    /// `get` with a missing key read as `None`
    fn try_get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace the key, creating it when absent
    fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        match self.put(key, value) {
            Err(StoreError::NotFound(_)) => self.post(key, value),
            other => other,
        }
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<IndexMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Transport("in-memory store lock poisoned".to_string())
}

impl VariableStore for InMemoryStore {
    fn get(&self, key: &str) -> StoreResult<String> {
        self.entries
            .read()
            .map_err(poisoned)?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn post(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.contains_key(key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        debug!(key, "store post");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        match entries.get_mut(key) {
            Some(existing) => {
                debug!(key, "store put");
                *existing = value.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        debug!(key, "store delete");
        entries
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.read().map_err(poisoned)?.keys().cloned().collect())
    }
}
