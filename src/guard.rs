//! Startup guard against focusing session-restored tabs.
//!
//! Right after the browser starts, restored sessions open many tabs at once.
//! The guard suppresses focusing for a short window after the startup event.
//!
//! # States
//!
//! | State | Condition |
//! |-------|-----------|
//! | inactive | `until == 0` or `now >= until` |
//! | active | `now < until` |
//!
//! The deadline lives in an in-process cache and is mirrored to the session
//! store so a restarted worker in the same browser session still honors it.
//! The cache is authoritative; session store failures are ignored.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::store::{Entries, KeyValueStore};

// ============================================================================
// Types
// ============================================================================

/// Cached guard deadline.
#[derive(Debug, Default, Clone, Copy)]
struct GuardCache {
    /// Deadline in epoch milliseconds, `0` when inactive.
    until: u64,
    /// Whether the cache has been armed or loaded this process.
    loaded: bool,
}

// ============================================================================
// StartupGuard
// ============================================================================

/// Time-boxed suppression window after a process startup event.
pub struct StartupGuard {
    /// Volatile store, if the host has one.
    session: Option<Arc<dyn KeyValueStore>>,
    /// Session store key for the deadline.
    key: String,
    /// Suppression window length.
    window: Duration,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// In-process deadline.
    cache: Mutex<GuardCache>,
}

impl fmt::Debug for StartupGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupGuard")
            .field("key", &self.key)
            .field("window", &self.window)
            .field("cache", &*self.cache.lock())
            .finish_non_exhaustive()
    }
}

impl StartupGuard {
    /// Creates an unloaded guard.
    pub fn new(
        session: Option<Arc<dyn KeyValueStore>>,
        key: impl Into<String>,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            key: key.into(),
            window,
            clock,
            cache: Mutex::new(GuardCache::default()),
        }
    }

    /// Returns the cached deadline, `0` when none is set.
    #[inline]
    #[must_use]
    pub fn until(&self) -> u64 {
        self.cache.lock().until
    }
}

// ============================================================================
// StartupGuard - Transitions
// ============================================================================

impl StartupGuard {
    /// Activates the guard for one window starting now. Returns the deadline.
    pub async fn arm(&self) -> u64 {
        let until = self
            .clock
            .now_ms()
            .saturating_add(self.window.as_millis() as u64);

        *self.cache.lock() = GuardCache {
            until,
            loaded: true,
        };
        info!(until, window_ms = self.window.as_millis() as u64, "Startup guard armed");

        if let Some(session) = &self.session {
            let mut entries = Entries::default();
            entries.insert(self.key.clone(), json!(until));
            if let Err(e) = session.set(entries).await {
                debug!(error = %e, "Startup guard not mirrored to session store");
            }
        }

        until
    }

    /// Loads the deadline from the session store, once per process.
    ///
    /// Does nothing if the guard was already armed or loaded. A failed read
    /// counts as "no guard".
    pub async fn load(&self) {
        if self.cache.lock().loaded {
            return;
        }

        let until = match &self.session {
            None => 0,
            Some(session) => match session.get(&[self.key.as_str()]).await {
                Ok(entries) => entries
                    .get(&self.key)
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                Err(e) => {
                    debug!(error = %e, "Startup guard unreadable, treating as inactive");
                    0
                }
            },
        };

        let mut cache = self.cache.lock();
        // An arm() that raced the read wins.
        if !cache.loaded {
            *cache = GuardCache {
                until,
                loaded: true,
            };
            debug!(until, "Startup guard loaded");
        }
    }

    /// Returns `true` while the guard is active.
    ///
    /// The first query after the deadline clears the cache and removes the
    /// session store entry.
    pub async fn is_active(&self) -> bool {
        let now = self.clock.now_ms();

        {
            let mut cache = self.cache.lock();
            if cache.until == 0 {
                return false;
            }
            if now < cache.until {
                return true;
            }
            cache.until = 0;
        }

        debug!("Startup guard expired");
        if let Some(session) = &self.session
            && let Err(e) = session.remove(&[self.key.as_str()]).await
        {
            debug!(error = %e, "Expired startup guard not removed from session store");
        }
        false
    }

    /// Loads if needed, then queries.
    pub async fn check(&self) -> bool {
        self.load().await;
        self.is_active().await
    }
}

// ============================================================================
// Tests
// ============================================================================
