//! Per-scope configuration.
//!
//! One [`ScopeConfig`] parameterizes the whole activation core: which scope
//! it serves, whether users may customize the default snooze length, and how
//! long the startup guard lasts.
//!
//! # Example
//!
//! ```ignore
//! use newtab_focus::{Scope, ScopeConfig};
//!
//! let config = ScopeConfig::new(Scope::incognito())
//!     .with_minutes_customization(false)
//!     .with_startup_guard_ms(5_000);
//! ```
//!
//! The struct also deserializes from JSON with every field optional:
//!
//! ```json
//! { "scope": "incog", "minutesCustomization": true }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::activation::MinutesPolicy;
use crate::error::{Error, Result};
use crate::identifiers::Scope;

// ============================================================================
// Constants
// ============================================================================

/// Snooze length used when nothing valid is stored.
pub const DEFAULT_SNOOZE_MINUTES: u32 = 5;

/// Upper bound on snooze minutes when customization is enabled (24 hours).
pub const MAX_SNOOZE_MINUTES: u32 = 1440;

/// Suppression window after a process startup event.
pub const DEFAULT_STARTUP_GUARD_MS: u64 = 10_000;

// ============================================================================
// ScopeConfig
// ============================================================================

/// Configuration for one scope's activation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeConfig {
    /// Namespace for storage keys and the alarm name.
    pub scope: Scope,

    /// Allow users to change the default snooze length.
    ///
    /// When off, the default is fixed, no upper cap applies to explicit
    /// snooze lengths, and `setSnoozeMinutes` is rejected.
    pub minutes_customization: bool,

    /// Default snooze length in minutes.
    pub default_snooze_minutes: u32,

    /// Startup guard window in milliseconds.
    pub startup_guard_ms: u64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self::new(Scope::normal())
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ScopeConfig {
    /// Creates a configuration for `scope` with default settings.
    #[inline]
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            minutes_customization: true,
            default_snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            startup_guard_ms: DEFAULT_STARTUP_GUARD_MS,
        }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Config`] if
    /// the values are out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ScopeConfig {
    /// Enables or disables snooze-length customization.
    #[inline]
    #[must_use]
    pub fn with_minutes_customization(mut self, enabled: bool) -> Self {
        self.minutes_customization = enabled;
        self
    }

    /// Sets the default snooze length.
    #[inline]
    #[must_use]
    pub fn with_default_snooze_minutes(mut self, minutes: u32) -> Self {
        self.default_snooze_minutes = minutes;
        self
    }

    /// Sets the startup guard window.
    #[inline]
    #[must_use]
    pub fn with_startup_guard_ms(mut self, ms: u64) -> Self {
        self.startup_guard_ms = ms;
        self
    }
}

// ============================================================================
// Derived Values
// ============================================================================

impl ScopeConfig {
    /// Returns the startup guard window as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn startup_guard(&self) -> Duration {
        Duration::from_millis(self.startup_guard_ms)
    }

    /// Returns the minutes validation policy for this scope.
    #[must_use]
    pub fn minutes_policy(&self) -> MinutesPolicy {
        let cap = self.minutes_customization.then_some(MAX_SNOOZE_MINUTES);
        MinutesPolicy::new(self.default_snooze_minutes, cap)
    }

    /// Checks that the configured values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the default snooze length is zero or
    /// above the cap.
    pub fn validate(&self) -> Result<()> {
        if self.default_snooze_minutes == 0 {
            return Err(Error::config("default snooze minutes must be positive"));
        }

        if self.minutes_customization && self.default_snooze_minutes > MAX_SNOOZE_MINUTES {
            return Err(Error::config(format!(
                "default snooze minutes must not exceed {MAX_SNOOZE_MINUTES}, got {}",
                self.default_snooze_minutes
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScopeConfig::default();
        assert_eq!(config.scope, Scope::normal());
        assert!(config.minutes_customization);
        assert_eq!(config.default_snooze_minutes, 5);
        assert_eq!(config.startup_guard(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_methods() {
        let config = ScopeConfig::new(Scope::incognito())
            .with_minutes_customization(false)
            .with_default_snooze_minutes(30)
            .with_startup_guard_ms(2_000);

        assert_eq!(config.scope.as_str(), "incog");
        assert!(!config.minutes_customization);
        assert_eq!(config.default_snooze_minutes, 30);
        assert_eq!(config.startup_guard_ms, 2_000);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ScopeConfig::from_json(r#"{ "scope": "incog" }"#).expect("parse");
        assert_eq!(config.scope, Scope::incognito());
        assert_eq!(config.default_snooze_minutes, DEFAULT_SNOOZE_MINUTES);
        assert_eq!(config.startup_guard_ms, DEFAULT_STARTUP_GUARD_MS);
    }

    #[test]
    fn test_from_json_rejects_zero_minutes() {
        let err = ScopeConfig::from_json(r#"{ "defaultSnoozeMinutes": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_cap_only_with_customization() {
        let capped = ScopeConfig::default().with_default_snooze_minutes(2_000);
        assert!(capped.validate().is_err());

        let uncapped = capped.with_minutes_customization(false);
        assert!(uncapped.validate().is_ok());
    }

    #[test]
    fn test_minutes_policy_cap() {
        assert_eq!(
            ScopeConfig::default().minutes_policy().cap(),
            Some(MAX_SNOOZE_MINUTES)
        );
        assert_eq!(
            ScopeConfig::default()
                .with_minutes_customization(false)
                .minutes_policy()
                .cap(),
            None
        );
    }
}
