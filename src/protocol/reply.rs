//! Command replies.

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Reply
// ============================================================================

/// Outcome of a command, sent back to the caller.
///
/// # Format
///
/// ```json
/// { "ok": true }
/// { "ok": false, "error": "Invalid minutes: 0" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Whether the command succeeded.
    pub ok: bool,
    /// Error description when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    /// Creates a success reply.
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    /// Creates a failure reply.
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }

    /// Returns `true` if this is a success reply.
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl<T> From<Result<T>> for Reply {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
