//! Type-safe identifiers for browser entities and configuration scopes.
//!
//! Newtype wrappers prevent mixing tab and window IDs at compile time.
//!
//! | Type | Wraps | Example |
//! |------|-------|---------|
//! | [`TabId`] | `u32` | `42` |
//! | [`WindowId`] | `u32` | `1` |
//! | [`Scope`] | static string | `normal`, `incog` |

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TabId
// ============================================================================

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u32);

impl TabId {
    /// Creates a tab ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// WindowId
// ============================================================================

/// Browser window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u32);

impl WindowId {
    /// Creates a window ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Configuration namespace, e.g. normal vs. private browsing.
///
/// Every storage key and the snooze alarm name are suffixed with the scope,
/// so two scopes never share state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    /// Scope used by normal browsing windows.
    pub const NORMAL: &'static str = "normal";

    /// Scope used by private browsing windows.
    pub const INCOGNITO: &'static str = "incog";

    /// Creates a scope from any name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The normal browsing scope.
    #[inline]
    #[must_use]
    pub const fn normal() -> Self {
        Self(Cow::Borrowed(Self::NORMAL))
    }

    /// The private browsing scope.
    #[inline]
    #[must_use]
    pub const fn incognito() -> Self {
        Self(Cow::Borrowed(Self::INCOGNITO))
    }

    /// Returns the scope name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::normal()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_id_display() {
        assert_eq!(TabId::new(42).to_string(), "42");
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let json = serde_json::to_string(&WindowId::new(3)).expect("serialize");
        assert_eq!(json, "3");

        let tab: TabId = serde_json::from_str("17").expect("deserialize");
        assert_eq!(tab.as_u32(), 17);
    }

    #[test]
    fn test_scope_presets() {
        assert_eq!(Scope::normal().as_str(), "normal");
        assert_eq!(Scope::incognito().as_str(), "incog");
        assert_eq!(Scope::default(), Scope::normal());
        assert_eq!(Scope::new("work").to_string(), "work");
    }
}
