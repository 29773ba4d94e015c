//! Storage key and alarm names for a scope.

use crate::identifiers::Scope;

/// All names one scope uses in storage and for its snooze alarm.
///
/// | Field | Format |
/// |-------|--------|
/// | `enabled` | `enabled_<scope>` |
/// | `snooze_until` | `snoozeUntil_<scope>` |
/// | `snooze_minutes` | `snoozeMinutes_<scope>` |
/// | `startup_guard_until` | `startupGuardUntil_<scope>` |
/// | `alarm` | `snooze-expire-<scope>` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeKeys {
    /// Enabled flag key (local store).
    pub enabled: String,
    /// Snooze deadline key (local store).
    pub snooze_until: String,
    /// Default snooze length key (local store).
    pub snooze_minutes: String,
    /// Startup guard deadline key (session store).
    pub startup_guard_until: String,
    /// Snooze expiry alarm name.
    pub alarm: String,
}

impl ScopeKeys {
    /// Derives every name for `scope`.
    #[must_use]
    pub fn new(scope: &Scope) -> Self {
        Self {
            enabled: format!("enabled_{scope}"),
            snooze_until: format!("snoozeUntil_{scope}"),
            snooze_minutes: format!("snoozeMinutes_{scope}"),
            startup_guard_until: format!("startupGuardUntil_{scope}"),
            alarm: format!("snooze-expire-{scope}"),
        }
    }

    /// Keys holding the activation state, in read order.
    #[inline]
    #[must_use]
    pub fn state_keys(&self) -> [&str; 3] {
        [&self.enabled, &self.snooze_until, &self.snooze_minutes]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_scope_names() {
        let keys = ScopeKeys::new(&Scope::normal());
        assert_eq!(keys.enabled, "enabled_normal");
        assert_eq!(keys.snooze_until, "snoozeUntil_normal");
        assert_eq!(keys.snooze_minutes, "snoozeMinutes_normal");
        assert_eq!(keys.startup_guard_until, "startupGuardUntil_normal");
        assert_eq!(keys.alarm, "snooze-expire-normal");
    }

    #[test]
    fn test_scopes_do_not_collide() {
        let normal = ScopeKeys::new(&Scope::normal());
        let incog = ScopeKeys::new(&Scope::incognito());
        assert_ne!(normal.enabled, incog.enabled);
        assert_ne!(normal.alarm, incog.alarm);
        assert_eq!(incog.snooze_until, "snoozeUntil_incog");
    }
}
