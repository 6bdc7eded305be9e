//! Durable key-value storage for the cart list.
//!
//! The cart is persisted as a JSON array under a single key. The store is
//! shared by every open context (tab/page) and carries the host's "a key
//! changed in another context" signal as a broadcast channel, so the engine
//! never talks to a concrete storage event API directly.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Storage boundary errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the write.
    #[error("storage quota exceeded writing key {0}")]
    QuotaExceeded(String),

    /// The backing store is not usable at all (storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Notification that a key changed, delivered to every subscribed context.
///
/// `writer` identifies the context that performed the write so receivers can
/// skip their own mutations, mirroring how browser storage events only fire
/// in *other* tabs.
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub key: String,
    pub writer: Uuid,
}

/// Durable key-value storage shared across contexts.
///
/// Implementations must be swap-in replaceable for any embedded persistence;
/// the engine only ever reads and writes whole values.
pub trait CartStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the store itself is unusable; an
    /// absent key is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key` and announce the change.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write is rejected (quota, disabled).
    fn store(&self, key: &str, value: &str, writer: Uuid) -> Result<(), StorageError>;

    /// Remove `key` and announce the change.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store is unusable.
    fn remove(&self, key: &str, writer: Uuid) -> Result<(), StorageError>;

    /// Subscribe to change notifications from all contexts sharing the store.
    fn changes(&self) -> broadcast::Receiver<StoreChange>;
}

/// In-memory store shared across contexts behind an `Arc`, the way
/// `localStorage` is shared across tabs.
///
/// An optional per-value quota exercises the write-failure path.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quota(None)
    }

    /// Create a store that rejects values larger than `quota_bytes`.
    #[must_use]
    pub fn bounded(quota_bytes: usize) -> Self {
        Self::with_quota(Some(quota_bytes))
    }

    fn with_quota(quota_bytes: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            changes,
            quota_bytes,
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn announce(&self, key: &str, writer: Uuid) {
        // No subscribers is fine; contexts may not be watching yet
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            writer,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str, writer: Uuid) -> Result<(), StorageError> {
        if let Some(limit) = self.quota_bytes
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        self.write_entries()
            .insert(key.to_string(), value.to_string());
        self.announce(key, writer);
        Ok(())
    }

    fn remove(&self, key: &str, writer: Uuid) -> Result<(), StorageError> {
        if self.write_entries().remove(key).is_some() {
            self.announce(key, writer);
        }
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
