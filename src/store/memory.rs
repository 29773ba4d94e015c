//! In-memory [`KeyValueStore`].
//!
//! Serves as the session store on hosts without one, and as the store for
//! tests. Reads and writes can be made to fail on demand, and every
//! successful write is counted.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};

use super::{Entries, KeyValueStore};

// ============================================================================
// MemoryStore
// ============================================================================

/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Stored values.
    entries: Mutex<FxHashMap<String, Value>>,
    /// Fail every `get` when set.
    fail_reads: AtomicBool,
    /// Fail every `set` and `remove` when set.
    fail_writes: AtomicBool,
    /// Number of successful `set` calls.
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
        self.entries.lock().insert(key.into(), value);
        self
    }

    /// Returns a copy of one stored value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops every entry, like a session store after a restart.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Returns the number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes and removals fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

// ============================================================================
// KeyValueStore Implementation
// ============================================================================

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Entries> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::storage("read failed"));
        }

        let entries = self.entries.lock();
        let found: Entries = keys
            .iter()
            .filter_map(|key| entries.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect();

        trace!(requested = keys.len(), found = found.len(), "Memory store read");
        Ok(found)
    }

    async fn set(&self, entries: Entries) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("write failed"));
        }

        trace!(count = entries.len(), "Memory store write");
        self.entries.lock().extend(entries);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("remove failed"));
        }

        let mut entries = self.entries.lock();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_get_returns_only_present_keys() {
        let store = MemoryStore::new().with_entry("a", json!(1));

        let got = store.get(&["a", "b"]).await.expect("get");
        assert_eq!(got.len(), 1);
        assert_eq!(got.get("a"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_set_merges_and_counts() {
        let store = MemoryStore::new().with_entry("keep", json!(true));

        let mut entries = Entries::default();
        entries.insert("x".into(), json!("y"));
        store.set(entries).await.expect("set");

        assert_eq!(store.len(), 2);
        assert_eq!(store.value("keep"), Some(json!(true)));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new().with_entry("a", json!(1));
        store.remove(&["a", "missing"]).await.expect("remove");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();

        store.set_fail_reads(true);
        assert!(store.get(&["a"]).await.unwrap_err().is_io_error());

        store.set_fail_writes(true);
        assert!(store.set(Entries::default()).await.is_err());
        assert!(store.remove(&["a"]).await.is_err());
        assert_eq!(store.write_count(), 0);

        store.set_fail_reads(false);
        store.set_fail_writes(false);
        tokio_test::assert_ok!(store.set(Entries::default()).await);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new().with_entry("a", json!(1));
        store.clear();
        assert!(store.is_empty());
    }
}
