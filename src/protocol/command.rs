//! Command messages accepted by the router.
//!
//! Commands arrive from the popup or other extension pages as JSON objects
//! tagged by `type`.
//!
//! | Type | Payload | Effect |
//! |------|---------|--------|
//! | `toggle` | - | Toggle, or wake from snooze |
//! | `snooze` | `minutes?` | Snooze for `minutes` or the stored default |
//! | `unsnooze` | - | End snooze |
//! | `setSnoozeMinutes` | `minutes` | Store a new default length |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Command
// ============================================================================

/// A command message.
///
/// `minutes` is kept as raw JSON; validation happens in the router so that
/// strings like `"15"` are accepted the same way numbers are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Toggle enabled, or wake from snooze.
    #[serde(rename = "toggle")]
    Toggle,

    /// Start or restart a snooze.
    #[serde(rename = "snooze")]
    Snooze {
        /// Snooze length; absent uses the stored default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minutes: Option<Value>,
    },

    /// End the snooze.
    #[serde(rename = "unsnooze")]
    Unsnooze,

    /// Store a new default snooze length.
    #[serde(rename = "setSnoozeMinutes")]
    SetSnoozeMinutes {
        /// New default length.
        #[serde(default)]
        minutes: Value,
    },
}

impl Command {
    /// Message type names the router understands.
    pub const TYPES: [&'static str; 4] = ["toggle", "snooze", "unsnooze", "setSnoozeMinutes"];

    /// Parses a command from an arbitrary JSON message.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCommand`] if the message is not an object, has no
    ///   string `type`, or its payload does not fit the type
    /// - [`Error::UnknownCommand`] if `type` is not a known command
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = match &value {
            Value::Object(map) => map
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::invalid_command("missing string `type`"))?,
            _ => return Err(Error::invalid_command("message must be a JSON object")),
        };

        if !Self::TYPES.contains(&kind) {
            return Err(Error::unknown_command(kind));
        }

        serde_json::from_value(value).map_err(|e| Error::invalid_command(e.to_string()))
    }

    /// Returns the message type name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Snooze { .. } => "snooze",
            Self::Unsnooze => "unsnooze",
            Self::SetSnoozeMinutes { .. } => "setSnoozeMinutes",
        }
    }
}

// ============================================================================
// Shortcut
// ============================================================================

/// Keyboard shortcuts bound by the extension manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// `toggle-enabled`
    ToggleEnabled,
    /// `snooze`, using the stored default length.
    Snooze,
}

impl Shortcut {
    /// Maps a manifest command name to a shortcut.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "toggle-enabled" => Some(Self::ToggleEnabled),
            "snooze" => Some(Self::Snooze),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
