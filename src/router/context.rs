//! Per-scope context shared by the router's handlers.
//!
//! A [`ScopeContext`] owns everything one scope needs: configuration, the
//! activation machine, the startup guard and the focus dispatcher. It is
//! built once at process start and handed to the router.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use newtab_focus::{EventRouter, MemoryStore, ScopeConfig, ScopeContext, SystemClock, TokioAlarms};
//!
//! let (handle, inbox) = EventRouter::inbox();
//! let clock = Arc::new(SystemClock);
//!
//! let context = ScopeContext::builder(ScopeConfig::default())
//!     .local_store(Arc::new(MemoryStore::new()))
//!     .session_store(Arc::new(MemoryStore::new()))
//!     .alarms(Arc::new(TokioAlarms::new(clock.clone(), handle.sender())))
//!     .actuator(Arc::new(MyActuator))
//!     .clock(clock)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::activation::ActivationMachine;
use crate::browser::{
    AlarmScheduler, FocusActuator, FocusDispatcher, LogIndicator, StatusIndicator,
};
use crate::clock::{Clock, SystemClock};
use crate::config::ScopeConfig;
use crate::error::{Error, Result};
use crate::guard::StartupGuard;
use crate::store::{KeyValueStore, ScopeKeys};

// ============================================================================
// ScopeContext
// ============================================================================

/// Everything one scope's router needs.
pub struct ScopeContext {
    /// Scope configuration.
    config: ScopeConfig,
    /// Activation state machine.
    machine: ActivationMachine,
    /// Startup guard.
    guard: StartupGuard,
    /// Deferred tab focusing.
    focus: FocusDispatcher,
}

impl fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeContext")
            .field("config", &self.config)
            .field("machine", &self.machine)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl ScopeContext {
    /// Starts building a context for `config`.
    #[inline]
    #[must_use]
    pub fn builder(config: ScopeConfig) -> ScopeContextBuilder {
        ScopeContextBuilder::new(config)
    }

    /// Returns the scope configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Returns the activation machine.
    #[inline]
    #[must_use]
    pub fn machine(&self) -> &ActivationMachine {
        &self.machine
    }

    /// Returns the startup guard.
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &StartupGuard {
        &self.guard
    }

    /// Returns the focus dispatcher.
    #[inline]
    #[must_use]
    pub fn focus(&self) -> &FocusDispatcher {
        &self.focus
    }
}

// ============================================================================
// ScopeContextBuilder
// ============================================================================

/// Builder for a [`ScopeContext`].
///
/// The local store, alarm scheduler and focus actuator are required. The
/// session store is optional; without it the startup guard lives in memory
/// only. The indicator defaults to [`LogIndicator`] and the clock to
/// [`SystemClock`].
pub struct ScopeContextBuilder {
    config: ScopeConfig,
    local: Option<Arc<dyn KeyValueStore>>,
    session: Option<Arc<dyn KeyValueStore>>,
    alarms: Option<Arc<dyn AlarmScheduler>>,
    actuator: Option<Arc<dyn FocusActuator>>,
    indicator: Option<Arc<dyn StatusIndicator>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ScopeContextBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            config,
            local: None,
            session: None,
            alarms: None,
            actuator: None,
            indicator: None,
            clock: None,
        }
    }

    /// Sets the persistent store.
    #[must_use]
    pub fn local_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.local = Some(store);
        self
    }

    /// Sets the volatile session store.
    #[must_use]
    pub fn session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Sets the alarm scheduler.
    #[must_use]
    pub fn alarms(mut self, alarms: Arc<dyn AlarmScheduler>) -> Self {
        self.alarms = Some(alarms);
        self
    }

    /// Sets the focus actuator.
    #[must_use]
    pub fn actuator(mut self, actuator: Arc<dyn FocusActuator>) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Sets the status indicator.
    #[must_use]
    pub fn indicator(mut self, indicator: Arc<dyn StatusIndicator>) -> Self {
        self.indicator = Some(indicator);
        self
    }

    /// Sets the clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration and assembles the context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or a
    /// required collaborator is missing.
    pub fn build(self) -> Result<ScopeContext> {
        self.config.validate()?;

        let local = self
            .local
            .ok_or_else(|| Error::config("local store is required. Use .local_store() to set it."))?;
        let alarms = self
            .alarms
            .ok_or_else(|| Error::config("alarm scheduler is required. Use .alarms() to set it."))?;
        let actuator = self
            .actuator
            .ok_or_else(|| Error::config("focus actuator is required. Use .actuator() to set it."))?;
        let indicator = self.indicator.unwrap_or_else(|| Arc::new(LogIndicator));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let keys = ScopeKeys::new(&self.config.scope);
        let guard = StartupGuard::new(
            self.session,
            keys.startup_guard_until,
            self.config.startup_guard(),
            Arc::clone(&clock),
        );
        let machine = ActivationMachine::new(&self.config, local, alarms, indicator, clock);

        debug!(scope = %self.config.scope, "Scope context built");

        Ok(ScopeContext {
            config: self.config,
            machine,
            guard,
            focus: FocusDispatcher::new(actuator),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::Scope;
    use crate::store::MemoryStore;
    use crate::testing::{RecordingActuator, RecordingAlarms};

    fn complete(config: ScopeConfig) -> ScopeContextBuilder {
        ScopeContext::builder(config)
            .local_store(Arc::new(MemoryStore::new()))
            .alarms(Arc::new(RecordingAlarms::default()))
            .actuator(Arc::new(RecordingActuator::default()))
    }

    #[test]
    fn test_build_with_required_parts() {
        let context = complete(ScopeConfig::new(Scope::incognito()))
            .build()
            .expect("build");
        assert_eq!(context.config().scope, Scope::incognito());
        assert_eq!(context.machine().alarm_name(), "snooze-expire-incog");
    }

    #[test]
    fn test_build_fails_without_local_store() {
        let err = ScopeContext::builder(ScopeConfig::default())
            .alarms(Arc::new(RecordingAlarms::default()))
            .actuator(Arc::new(RecordingActuator::default()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("local store"));
    }

    #[test]
    fn test_build_fails_without_alarms() {
        let err = ScopeContext::builder(ScopeConfig::default())
            .local_store(Arc::new(MemoryStore::new()))
            .actuator(Arc::new(RecordingActuator::default()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("alarm"));
    }

    #[test]
    fn test_build_fails_without_actuator() {
        let err = ScopeContext::builder(ScopeConfig::default())
            .local_store(Arc::new(MemoryStore::new()))
            .alarms(Arc::new(RecordingAlarms::default()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("actuator"));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ScopeConfig::default().with_default_snooze_minutes(0);
        let err = complete(config).build().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
