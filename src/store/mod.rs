//! Key-value persistence seam.
//!
//! The host provides two stores per scope:
//!
//! | Store | Lifetime | Holds |
//! |-------|----------|-------|
//! | local | survives restarts | activation state |
//! | session | wiped on restart | startup guard deadline |
//!
//! Both sit behind [`KeyValueStore`], an async interface returning explicit
//! [`Result`]s. Values are JSON so hosts can pass their storage payloads
//! through unchanged.

// ============================================================================
// Submodules
// ============================================================================

/// Scope-namespaced key names.
pub mod keys;

/// In-memory store implementation.
pub mod memory;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Re-exports
// ============================================================================

pub use keys::ScopeKeys;
pub use memory::MemoryStore;

// ============================================================================
// Types
// ============================================================================

/// A batch of key-value pairs.
pub type Entries = FxHashMap<String, Value>;

// ============================================================================
// KeyValueStore
// ============================================================================

/// Asynchronous key-value storage.
///
/// Implementations wrap whatever the host offers (extension storage areas,
/// files, databases) and translate failures into [`crate::Error::Storage`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the given keys. Missing keys are absent from the result.
    async fn get(&self, keys: &[&str]) -> Result<Entries>;

    /// Writes all entries in one batch.
    async fn set(&self, entries: Entries) -> Result<()>;

    /// Removes the given keys. Removing a missing key is not an error.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}
