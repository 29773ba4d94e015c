//! Events delivered to the router.
//!
//! | Event | Source |
//! |-------|--------|
//! | `Installed` | extension installed or updated |
//! | `Startup` | browser process started |
//! | `TabCreated` | a tab was opened |
//! | `AlarmFired` | a named alarm expired |
//! | `ActionClicked` | toolbar button clicked |
//! | `Shortcut` | keyboard command |
//! | `Message` | command message from an extension page |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tokio::sync::oneshot;

use crate::browser::TabInfo;

use super::Reply;

// ============================================================================
// RouterEvent
// ============================================================================

/// One event for the router's serialized inbox.
#[derive(Debug)]
pub enum RouterEvent {
    /// Extension installed or updated.
    Installed,

    /// Browser process started.
    Startup,

    /// A tab was created.
    TabCreated(TabInfo),

    /// A named alarm expired.
    AlarmFired {
        /// Alarm name.
        name: String,
    },

    /// Toolbar action clicked.
    ActionClicked,

    /// Keyboard command by manifest name.
    Shortcut {
        /// Manifest command name.
        name: String,
    },

    /// Command message awaiting a reply.
    Message {
        /// Raw message payload.
        payload: Value,
        /// Where to send the reply, if anyone is listening.
        respond_to: Option<oneshot::Sender<Reply>>,
    },
}

impl RouterEvent {
    /// Returns a short name for logging.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Startup => "startup",
            Self::TabCreated(_) => "tabCreated",
            Self::AlarmFired { .. } => "alarmFired",
            Self::ActionClicked => "actionClicked",
            Self::Shortcut { .. } => "shortcut",
            Self::Message { .. } => "message",
        }
    }

    /// Creates a message event and the receiver for its reply.
    #[must_use]
    pub fn message(payload: Value) -> (Self, oneshot::Receiver<Reply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self::Message {
                payload,
                respond_to: Some(tx),
            },
            rx,
        )
    }
}
