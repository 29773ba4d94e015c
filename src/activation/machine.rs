//! Activation operations over the persistent store.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::browser::{AlarmScheduler, Status, StatusIndicator, StatusView};
use crate::clock::Clock;
use crate::config::ScopeConfig;
use crate::error::{Error, Result};
use crate::identifiers::Scope;
use crate::store::{KeyValueStore, ScopeKeys};

use super::state::{ActivationState, MinutesPolicy, StatePatch};

// ============================================================================
// Constants
// ============================================================================

const MS_PER_MINUTE: u64 = 60_000;

// ============================================================================
// ActivationMachine
// ============================================================================

/// Reads and mutates one scope's [`ActivationState`].
///
/// Every mutation goes through [`set_state`](Self::set_state), which writes
/// before refreshing the status indicator, so a following
/// [`state`](Self::state) call sees the write.
pub struct ActivationMachine {
    /// Scope served, for logging.
    scope: Scope,
    /// Storage keys and alarm name.
    keys: ScopeKeys,
    /// Minutes validation rules.
    policy: MinutesPolicy,
    /// Persistent store.
    store: Arc<dyn KeyValueStore>,
    /// Snooze expiry timers.
    alarms: Arc<dyn AlarmScheduler>,
    /// Status surface.
    indicator: Arc<dyn StatusIndicator>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ActivationMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationMachine")
            .field("scope", &self.scope)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ActivationMachine {
    /// Creates a machine for the scope described by `config`.
    pub fn new(
        config: &ScopeConfig,
        store: Arc<dyn KeyValueStore>,
        alarms: Arc<dyn AlarmScheduler>,
        indicator: Arc<dyn StatusIndicator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scope: config.scope.clone(),
            keys: ScopeKeys::new(&config.scope),
            policy: config.minutes_policy(),
            store,
            alarms,
            indicator,
            clock,
        }
    }
}

// ============================================================================
// ActivationMachine - Accessors
// ============================================================================

impl ActivationMachine {
    /// Returns the snooze expiry alarm name.
    #[inline]
    #[must_use]
    pub fn alarm_name(&self) -> &str {
        &self.keys.alarm
    }

    /// Returns the minutes validation rules.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &MinutesPolicy {
        &self.policy
    }

    /// Returns the current time from the machine's clock.
    #[inline]
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

// ============================================================================
// ActivationMachine - State Access
// ============================================================================

impl ActivationMachine {
    /// Reads the persisted state, applying defaults for missing or invalid
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read.
    pub async fn state(&self) -> Result<ActivationState> {
        let entries = self.store.get(&self.keys.state_keys()).await?;
        Ok(ActivationState::from_entries(
            &entries,
            &self.keys,
            &self.policy,
        ))
    }

    /// Writes the fields present in `patch`, then refreshes the status.
    ///
    /// Returns `false` without touching the store or the indicator when the
    /// patch has nothing valid to write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the write fails. The status is not
    /// refreshed in that case.
    pub async fn set_state(&self, patch: StatePatch) -> Result<bool> {
        let entries = patch.to_entries(&self.keys, &self.policy);
        if entries.is_empty() {
            debug!(scope = %self.scope, "Empty state patch, nothing to write");
            return Ok(false);
        }

        self.store.set(entries).await?;
        debug!(scope = %self.scope, ?patch, "State written");

        self.refresh_status().await;
        Ok(true)
    }

    /// Pushes the current status to the indicator.
    ///
    /// Failures are logged and dropped; the indicator is cosmetic.
    pub async fn refresh_status(&self) {
        let state = match self.state().await {
            Ok(state) => state,
            Err(e) => {
                warn!(scope = %self.scope, error = %e, "Status refresh skipped, state unreadable");
                return;
            }
        };

        let view = StatusView::from(Status::from_state(&state, self.now_ms()));
        if let Err(e) = self.indicator.show(&view).await {
            warn!(scope = %self.scope, error = %e, "Status indicator update failed");
        }
    }
}

// ============================================================================
// ActivationMachine - Operations
// ============================================================================

impl ActivationMachine {
    /// Flips the enabled flag, or ends the snooze if one is running.
    ///
    /// While snoozed this behaves exactly like [`unsnooze`](Self::unsnooze)
    /// and never disables.
    ///
    /// # Errors
    ///
    /// Returns storage or alarm errors.
    pub async fn toggle(&self) -> Result<()> {
        let state = self.state().await?;

        if state.is_snoozed(self.now_ms()) {
            debug!(scope = %self.scope, "Toggle while snoozed, waking up");
            return self.unsnooze().await;
        }

        let enabled = !state.enabled;
        self.set_state(StatePatch::new().enabled(enabled).snooze_until(0))
            .await?;
        self.alarms.clear(&self.keys.alarm).await?;

        info!(scope = %self.scope, enabled, "Toggled");
        Ok(())
    }

    /// Snoozes for `minutes`, or for the persisted default when `minutes` is
    /// absent or invalid. Returns the snooze deadline.
    ///
    /// Always enables and (re)schedules the expiry alarm.
    ///
    /// # Errors
    ///
    /// Returns storage or alarm errors.
    pub async fn snooze(&self, minutes: Option<i64>) -> Result<u64> {
        let applied = match minutes.and_then(|raw| self.policy.validate(raw)) {
            Some(valid) => valid,
            None => {
                if let Some(raw) = minutes {
                    debug!(scope = %self.scope, raw, "Snooze minutes rejected, using default");
                }
                self.state().await?.snooze_minutes
            }
        };

        let until = self
            .now_ms()
            .saturating_add(u64::from(applied) * MS_PER_MINUTE);

        self.set_state(StatePatch::new().enabled(true).snooze_until(until))
            .await?;
        self.alarms.schedule(&self.keys.alarm, until).await?;

        info!(scope = %self.scope, minutes = applied, until, "Snoozed");
        Ok(until)
    }

    /// Ends any snooze and enables.
    ///
    /// # Errors
    ///
    /// Returns storage or alarm errors.
    pub async fn unsnooze(&self) -> Result<()> {
        self.set_state(StatePatch::new().enabled(true).snooze_until(0))
            .await?;
        self.alarms.clear(&self.keys.alarm).await?;

        info!(scope = %self.scope, "Snooze ended");
        Ok(())
    }

    /// Stores a new default snooze length.
    ///
    /// Running snoozes keep their deadline.
    ///
    /// # Errors
    ///
    /// - [`Error::FeatureDisabled`] if the scope has no minutes customization
    /// - [`Error::InvalidMinutes`] if `raw` fails validation
    /// - [`Error::Storage`] if the write fails
    pub async fn set_snooze_minutes(&self, raw: i64) -> Result<u32> {
        if !self.policy.customizable() {
            return Err(Error::feature_disabled("snooze minutes customization"));
        }

        let minutes = self
            .policy
            .validate(raw)
            .ok_or_else(|| Error::invalid_minutes(raw))?;

        self.set_state(StatePatch::new().snooze_minutes(i64::from(minutes)))
            .await?;

        info!(scope = %self.scope, minutes, "Default snooze minutes updated");
        Ok(minutes)
    }

    /// Clears a snooze whose deadline has passed.
    ///
    /// Returns `false` without writing if no snooze is outstanding or its
    /// deadline is still ahead, which makes late or cancelled alarms no-ops.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    pub async fn expire_snooze(&self) -> Result<bool> {
        let state = self.state().await?;

        if state.snooze_until == 0 || self.now_ms() < state.snooze_until {
            debug!(scope = %self.scope, snooze_until = state.snooze_until, "No snooze to expire");
            return Ok(false);
        }

        self.set_state(StatePatch::new().snooze_until(0)).await?;
        info!(scope = %self.scope, "Snooze expired");
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
