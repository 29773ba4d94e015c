//! Error types for the activation core.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use newtab_focus::{Result, Error};
//!
//! async fn example(machine: &ActivationMachine) -> Result<()> {
//!     machine.snooze(Some(15)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::FeatureDisabled`] |
//! | Validation | [`Error::InvalidMinutes`], [`Error::InvalidCommand`], [`Error::UnknownCommand`] |
//! | Collaborator I/O | [`Error::Storage`], [`Error::Alarm`] |
//! | Stale effects | [`Error::TabNotFound`], [`Error::WindowNotFound`] |
//! | External | [`Error::Json`], [`Error::ChannelClosed`], [`Error::InboxClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

use crate::identifiers::{TabId, WindowId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when a scope context is built without a required collaborator
    /// or with invalid settings.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Operation belongs to a feature that is switched off for this scope.
    #[error("Feature disabled: {feature}")]
    FeatureDisabled {
        /// Name of the disabled feature.
        feature: String,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Snooze minutes failed validation.
    #[error("Invalid minutes: {value}")]
    InvalidMinutes {
        /// The rejected input, rendered for display.
        value: String,
    },

    /// Malformed command payload.
    #[error("Invalid command: {message}")]
    InvalidCommand {
        /// Description of what is wrong with the payload.
        message: String,
    },

    /// Command type not recognized by the router.
    #[error("Unknown command: {command}")]
    UnknownCommand {
        /// The unrecognized command type.
        command: String,
    },

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// Key-value store read or write failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Timer scheduling or cancellation failed.
    #[error("Alarm error: {message}")]
    Alarm {
        /// Description of the alarm failure.
        message: String,
    },

    // ========================================================================
    // Stale Effect Errors
    // ========================================================================
    /// Tab no longer exists.
    #[error("Tab not found: {tab_id}")]
    TabNotFound {
        /// The missing tab ID.
        tab_id: TabId,
    },

    /// Window no longer exists.
    #[error("Window not found: {window_id}")]
    WindowNotFound {
        /// The missing window ID.
        window_id: WindowId,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),

    /// The router is no longer running.
    #[error("Router inbox closed")]
    InboxClosed,
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a feature disabled error.
    #[inline]
    pub fn feature_disabled(feature: impl Into<String>) -> Self {
        Self::FeatureDisabled {
            feature: feature.into(),
        }
    }

    /// Creates an invalid minutes error.
    #[inline]
    pub fn invalid_minutes(value: impl ToString) -> Self {
        Self::InvalidMinutes {
            value: value.to_string(),
        }
    }

    /// Creates an invalid command error.
    #[inline]
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::InvalidCommand {
            message: message.into(),
        }
    }

    /// Creates an unknown command error.
    #[inline]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates a storage error.
    #[inline]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates an alarm error.
    #[inline]
    pub fn alarm(message: impl Into<String>) -> Self {
        Self::Alarm {
            message: message.into(),
        }
    }

    /// Creates a tab not found error.
    #[inline]
    pub fn tab_not_found(tab_id: TabId) -> Self {
        Self::TabNotFound { tab_id }
    }

    /// Creates a window not found error.
    #[inline]
    pub fn window_not_found(window_id: WindowId) -> Self {
        Self::WindowNotFound { window_id }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the caller supplied bad input.
    ///
    /// State is never changed when one of these is returned.
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMinutes { .. } | Self::InvalidCommand { .. } | Self::UnknownCommand { .. }
        )
    }

    /// Returns `true` if a collaborator failed to read, write or schedule.
    #[inline]
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Alarm { .. })
    }

    /// Returns `true` if the error refers to a tab or window that is gone.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::TabNotFound { .. } | Self::WindowNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::storage("quota exceeded");
        assert_eq!(err.to_string(), "Storage error: quota exceeded");
    }

    #[test]
    fn test_invalid_minutes_display() {
        let err = Error::invalid_minutes(-5);
        assert_eq!(err.to_string(), "Invalid minutes: -5");
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::invalid_minutes(0).is_validation_error());
        assert!(Error::unknown_command("explode").is_validation_error());
        assert!(Error::invalid_command("not an object").is_validation_error());
        assert!(!Error::storage("down").is_validation_error());
    }

    #[test]
    fn test_is_io_error() {
        assert!(Error::storage("down").is_io_error());
        assert!(Error::alarm("no timers").is_io_error());
        assert!(!Error::config("missing").is_io_error());
    }

    #[test]
    fn test_is_stale() {
        let tab_err = Error::tab_not_found(TabId::new(7));
        let window_err = Error::window_not_found(WindowId::new(2));

        assert!(tab_err.is_stale());
        assert!(window_err.is_stale());
        assert!(!Error::alarm("x").is_stale());
        assert_eq!(tab_err.to_string(), "Tab not found: 7");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
