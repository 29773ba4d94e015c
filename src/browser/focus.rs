//! Bringing tabs and windows to the front.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::{TabId, WindowId};

// ============================================================================
// TabInfo
// ============================================================================

/// Snapshot of a tab as reported by the tab-created event.
///
/// # Format
///
/// ```json
/// { "id": 12, "windowId": 3, "active": false, "discarded": false }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    /// Tab ID.
    pub id: TabId,
    /// Containing window, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    /// Whether the tab is already the active tab of its window.
    #[serde(default)]
    pub active: bool,
    /// Whether the tab is discarded (unloaded).
    #[serde(default)]
    pub discarded: bool,
}

impl TabInfo {
    /// Creates a loaded, inactive tab in `window_id`.
    #[inline]
    #[must_use]
    pub fn new(id: TabId, window_id: WindowId) -> Self {
        Self {
            id,
            window_id: Some(window_id),
            active: false,
            discarded: false,
        }
    }
}

// ============================================================================
// FocusActuator
// ============================================================================

/// Host operations that change which tab and window are in front.
///
/// Either call may fail with [`crate::Error::TabNotFound`] or
/// [`crate::Error::WindowNotFound`] when the target closed in the meantime.
#[async_trait]
pub trait FocusActuator: Send + Sync {
    /// Makes `tab` the active tab of its window.
    async fn activate_tab(&self, tab: TabId) -> Result<()>;

    /// Raises `window` above other windows.
    async fn focus_window(&self, window: WindowId) -> Result<()>;
}

// ============================================================================
// FocusDispatcher
// ============================================================================

/// Fire-and-forget wrapper around a [`FocusActuator`].
#[derive(Clone)]
pub struct FocusDispatcher {
    actuator: Arc<dyn FocusActuator>,
}

impl FocusDispatcher {
    /// Wraps `actuator`.
    #[must_use]
    pub fn new(actuator: Arc<dyn FocusActuator>) -> Self {
        Self { actuator }
    }

    /// Activates `tab` and focuses its window on a separate task.
    ///
    /// The task yields once before acting so the tab-created event settles
    /// first. Failures are logged and dropped; the returned handle is only
    /// useful for waiting on completion.
    pub fn bring_to_front(&self, tab: &TabInfo) -> JoinHandle<()> {
        let actuator = Arc::clone(&self.actuator);
        let tab_id = tab.id;
        let window_id = tab.window_id;

        tokio::spawn(async move {
            tokio::task::yield_now().await;

            if let Err(e) = actuator.activate_tab(tab_id).await {
                debug!(tab_id = %tab_id, error = %e, "Tab activation skipped");
            }

            if let Some(window_id) = window_id
                && let Err(e) = actuator.focus_window(window_id).await
            {
                debug!(window_id = %window_id, error = %e, "Window focus skipped");
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FocusCall, RecordingActuator};

    #[test]
    fn test_tab_info_deserialize_defaults() {
        let tab: TabInfo = serde_json::from_str(r#"{ "id": 4 }"#).expect("parse");
        assert_eq!(tab.id, TabId::new(4));
        assert_eq!(tab.window_id, None);
        assert!(!tab.active);
        assert!(!tab.discarded);
    }

    #[test]
    fn test_tab_info_camel_case() {
        let tab: TabInfo =
            serde_json::from_str(r#"{ "id": 4, "windowId": 9, "discarded": true }"#).expect("parse");
        assert_eq!(tab.window_id, Some(WindowId::new(9)));
        assert!(tab.discarded);
    }

    #[tokio::test]
    async fn test_bring_to_front_activates_then_focuses() {
        let actuator = Arc::new(RecordingActuator::default());
        let dispatcher = FocusDispatcher::new(actuator.clone());

        let tab = TabInfo::new(TabId::new(5), WindowId::new(2));
        dispatcher.bring_to_front(&tab).await.expect("task");

        assert_eq!(
            actuator.calls(),
            vec![
                FocusCall::ActivateTab(TabId::new(5)),
                FocusCall::FocusWindow(WindowId::new(2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_bring_to_front_is_deferred() {
        let actuator = Arc::new(RecordingActuator::default());
        let dispatcher = FocusDispatcher::new(actuator.clone());

        let handle = dispatcher.bring_to_front(&TabInfo::new(TabId::new(1), WindowId::new(1)));
        assert!(actuator.calls().is_empty());

        handle.await.expect("task");
        assert_eq!(actuator.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_tab_still_focuses_window() {
        let actuator = Arc::new(RecordingActuator::default().with_closed_tabs());
        let dispatcher = FocusDispatcher::new(actuator.clone());

        let tab = TabInfo::new(TabId::new(8), WindowId::new(3));
        dispatcher.bring_to_front(&tab).await.expect("task must not panic");

        assert_eq!(
            actuator.calls(),
            vec![FocusCall::FocusWindow(WindowId::new(3))]
        );
    }

    #[tokio::test]
    async fn test_missing_window_only_activates_tab() {
        let actuator = Arc::new(RecordingActuator::default());
        let dispatcher = FocusDispatcher::new(actuator.clone());

        let tab = TabInfo {
            window_id: None,
            ..TabInfo::new(TabId::new(8), WindowId::new(3))
        };
        dispatcher.bring_to_front(&tab).await.expect("task");

        assert_eq!(actuator.calls(), vec![FocusCall::ActivateTab(TabId::new(8))]);
    }
}
