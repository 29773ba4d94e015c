//! Recording test doubles for the browser collaborators.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::browser::{AlarmScheduler, FocusActuator, StatusIndicator, StatusView};
use crate::error::{Error, Result};
use crate::identifiers::{TabId, WindowId};

// ============================================================================
// Alarms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AlarmCall {
    Schedule(String, u64),
    Clear(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingAlarms {
    calls: Mutex<Vec<AlarmCall>>,
    fail: AtomicBool,
}

impl RecordingAlarms {
    pub(crate) fn calls(&self) -> Vec<AlarmCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Deadline of the most recent schedule not followed by a clear.
    pub(crate) fn pending(&self) -> Option<u64> {
        match self.calls.lock().last() {
            Some(AlarmCall::Schedule(_, when)) => Some(*when),
            _ => None,
        }
    }
}

#[async_trait]
impl AlarmScheduler for RecordingAlarms {
    async fn schedule(&self, name: &str, when_ms: u64) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::alarm("scheduling unavailable"));
        }
        self.calls
            .lock()
            .push(AlarmCall::Schedule(name.to_string(), when_ms));
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::alarm("clearing unavailable"));
        }
        let mut calls = self.calls.lock();
        let pending = matches!(calls.last(), Some(AlarmCall::Schedule(..)));
        calls.push(AlarmCall::Clear(name.to_string()));
        Ok(pending)
    }
}

// ============================================================================
// Focus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusCall {
    ActivateTab(TabId),
    FocusWindow(WindowId),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingActuator {
    calls: Mutex<Vec<FocusCall>>,
    tabs_closed: bool,
}

impl RecordingActuator {
    /// Every tab activation fails as if the tab had closed.
    pub(crate) fn with_closed_tabs(mut self) -> Self {
        self.tabs_closed = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<FocusCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FocusActuator for RecordingActuator {
    async fn activate_tab(&self, tab: TabId) -> Result<()> {
        if self.tabs_closed {
            return Err(Error::tab_not_found(tab));
        }
        self.calls.lock().push(FocusCall::ActivateTab(tab));
        Ok(())
    }

    async fn focus_window(&self, window: WindowId) -> Result<()> {
        self.calls.lock().push(FocusCall::FocusWindow(window));
        Ok(())
    }
}

// ============================================================================
// Indicator
// ============================================================================

#[derive(Debug, Default)]
pub(crate) struct RecordingIndicator {
    views: Mutex<Vec<StatusView>>,
}

impl RecordingIndicator {
    pub(crate) fn views(&self) -> Vec<StatusView> {
        self.views.lock().clone()
    }
}

#[async_trait]
impl StatusIndicator for RecordingIndicator {
    async fn show(&self, view: &StatusView) -> Result<()> {
        self.views.lock().push(view.clone());
        Ok(())
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
