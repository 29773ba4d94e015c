//! Activation state, patches and minutes validation.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::store::{Entries, ScopeKeys};

// ============================================================================
// ActivationState
// ============================================================================

/// Persisted activation settings for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationState {
    /// Whether new tabs are brought to the front at all.
    pub enabled: bool,
    /// Snooze deadline in epoch milliseconds, `0` when not snoozed.
    pub snooze_until: u64,
    /// Default snooze length for snoozes without an explicit length.
    pub snooze_minutes: u32,
}

impl ActivationState {
    /// Returns `true` if new tabs should be brought to the front at `now_ms`.
    #[inline]
    #[must_use]
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.enabled && now_ms >= self.snooze_until
    }

    /// Returns `true` if a snooze is still running at `now_ms`.
    #[inline]
    #[must_use]
    pub fn is_snoozed(&self, now_ms: u64) -> bool {
        self.enabled && now_ms < self.snooze_until
    }

    /// Parses stored entries, falling back to defaults per field.
    ///
    /// Missing keys take their default. Present values are coerced the way a
    /// loosely typed store would hold them: any truthy value enables,
    /// anything that is not a positive timestamp means "not snoozed", and
    /// minutes go through `policy`.
    #[must_use]
    pub fn from_entries(entries: &Entries, keys: &ScopeKeys, policy: &MinutesPolicy) -> Self {
        let enabled = entries.get(&keys.enabled).is_none_or(is_truthy);

        let snooze_until = entries
            .get(&keys.snooze_until)
            .and_then(as_timestamp)
            .unwrap_or(0);

        let snooze_minutes = if policy.customizable() {
            entries
                .get(&keys.snooze_minutes)
                .and_then(|v| policy.validate_value(v))
                .unwrap_or(policy.default_minutes())
        } else {
            policy.default_minutes()
        };

        Self {
            enabled,
            snooze_until,
            snooze_minutes,
        }
    }
}

// ============================================================================
// StatePatch
// ============================================================================

/// Partial update to an [`ActivationState`].
///
/// Only fields that are `Some` are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatePatch {
    /// New enabled flag.
    pub enabled: Option<bool>,
    /// New snooze deadline, `0` to clear.
    pub snooze_until: Option<u64>,
    /// New default snooze length. Dropped if it fails validation.
    pub snooze_minutes: Option<i64>,
}

impl StatePatch {
    /// Creates an empty patch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enabled flag.
    #[inline]
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the snooze deadline.
    #[inline]
    #[must_use]
    pub fn snooze_until(mut self, until_ms: u64) -> Self {
        self.snooze_until = Some(until_ms);
        self
    }

    /// Sets the default snooze length.
    #[inline]
    #[must_use]
    pub fn snooze_minutes(mut self, minutes: i64) -> Self {
        self.snooze_minutes = Some(minutes);
        self
    }

    /// Converts the patch into store entries.
    ///
    /// Invalid minutes, and minutes on scopes without customization, are
    /// left out. The result may be empty.
    #[must_use]
    pub fn to_entries(&self, keys: &ScopeKeys, policy: &MinutesPolicy) -> Entries {
        let mut entries = Entries::default();

        if let Some(enabled) = self.enabled {
            entries.insert(keys.enabled.clone(), json!(enabled));
        }

        if let Some(until) = self.snooze_until {
            entries.insert(keys.snooze_until.clone(), json!(until));
        }

        if let Some(raw) = self.snooze_minutes
            && policy.customizable()
            && let Some(minutes) = policy.validate(raw)
        {
            entries.insert(keys.snooze_minutes.clone(), json!(minutes));
        }

        entries
    }
}

// ============================================================================
// MinutesPolicy
// ============================================================================

/// Validation rules for snooze lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinutesPolicy {
    default_minutes: u32,
    cap: Option<u32>,
}

impl MinutesPolicy {
    /// Creates a policy. `cap` is the inclusive upper bound, if any.
    ///
    /// A capped policy also means the default length is user-customizable.
    #[inline]
    #[must_use]
    pub const fn new(default_minutes: u32, cap: Option<u32>) -> Self {
        Self {
            default_minutes,
            cap,
        }
    }

    /// Returns the fallback snooze length.
    #[inline]
    #[must_use]
    pub const fn default_minutes(&self) -> u32 {
        self.default_minutes
    }

    /// Returns the inclusive upper bound, if any.
    #[inline]
    #[must_use]
    pub const fn cap(&self) -> Option<u32> {
        self.cap
    }

    /// Returns `true` if users may change the default length.
    #[inline]
    #[must_use]
    pub const fn customizable(&self) -> bool {
        self.cap.is_some()
    }

    /// Accepts positive lengths within the cap.
    #[must_use]
    pub fn validate(&self, raw: i64) -> Option<u32> {
        let minutes = u32::try_from(raw).ok().filter(|m| *m > 0)?;
        match self.cap {
            Some(cap) if minutes > cap => None,
            _ => Some(minutes),
        }
    }

    /// Parses and validates a JSON value.
    #[must_use]
    pub fn validate_value(&self, value: &Value) -> Option<u32> {
        parse_minutes(value).and_then(|raw| self.validate(raw))
    }
}

// ============================================================================
// Coercion Helpers
// ============================================================================

/// Reads an integer from a JSON number or the leading integer of a string.
///
/// Fractions are truncated toward zero. Non-finite values, empty strings and
/// other JSON types yield `None`.
#[must_use]
pub fn parse_minutes(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        }),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Overflow saturates; validation rejects it anyway.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_timestamp(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f as u64)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::identifiers::Scope;

    fn keys() -> ScopeKeys {
        ScopeKeys::new(&Scope::normal())
    }

    fn capped() -> MinutesPolicy {
        MinutesPolicy::new(5, Some(1440))
    }

    fn state(enabled: bool, snooze_until: u64) -> ActivationState {
        ActivationState {
            enabled,
            snooze_until,
            snooze_minutes: 5,
        }
    }

    proptest! {
        #[test]
        fn disabled_is_never_active_or_snoozed(until in any::<u64>(), now in any::<u64>()) {
            let s = state(false, until);
            prop_assert!(!s.is_active(now));
            prop_assert!(!s.is_snoozed(now));
        }

        #[test]
        fn enabled_without_snooze_is_active(now in any::<u64>()) {
            let s = state(true, 0);
            prop_assert!(s.is_active(now));
            prop_assert!(!s.is_snoozed(now));
        }

        #[test]
        fn future_snooze_expires_on_its_own(now in 0u64..1 << 50, ahead in 1u64..1 << 30) {
            let s = state(true, now + ahead);
            prop_assert!(s.is_snoozed(now));
            prop_assert!(!s.is_active(now));
            prop_assert!(s.is_active(now + ahead));
            prop_assert!(!s.is_snoozed(now + ahead));
        }

        #[test]
        fn enabled_is_exactly_one_of_active_or_snoozed(until in any::<u64>(), now in any::<u64>()) {
            let s = state(true, until);
            prop_assert!(s.is_active(now) != s.is_snoozed(now));
        }
    }

    #[test]
    fn test_from_entries_defaults() {
        let s = ActivationState::from_entries(&Entries::default(), &keys(), &capped());
        assert_eq!(s, state(true, 0));
    }

    #[test]
    fn test_from_entries_coerces_loose_values() {
        let k = keys();
        let mut entries = Entries::default();
        entries.insert(k.enabled.clone(), json!(0));
        entries.insert(k.snooze_until.clone(), json!(null));
        entries.insert(k.snooze_minutes.clone(), json!("90"));

        let s = ActivationState::from_entries(&entries, &k, &capped());
        assert!(!s.enabled);
        assert_eq!(s.snooze_until, 0);
        assert_eq!(s.snooze_minutes, 90);
    }

    #[test]
    fn test_from_entries_invalid_minutes_fall_back() {
        let k = keys();
        let mut entries = Entries::default();
        entries.insert(k.snooze_minutes.clone(), json!(5000));

        let s = ActivationState::from_entries(&entries, &k, &capped());
        assert_eq!(s.snooze_minutes, 5);
    }

    #[test]
    fn test_from_entries_ignores_minutes_without_customization() {
        let k = keys();
        let mut entries = Entries::default();
        entries.insert(k.snooze_minutes.clone(), json!(90));

        let s = ActivationState::from_entries(&entries, &k, &MinutesPolicy::new(5, None));
        assert_eq!(s.snooze_minutes, 5);
    }

    #[test]
    fn test_patch_empty_has_no_entries() {
        assert!(StatePatch::new().to_entries(&keys(), &capped()).is_empty());
    }

    #[test]
    fn test_patch_drops_invalid_minutes() {
        let entries = StatePatch::new()
            .snooze_minutes(0)
            .to_entries(&keys(), &capped());
        assert!(entries.is_empty());

        let entries = StatePatch::new()
            .enabled(true)
            .snooze_minutes(-3)
            .to_entries(&keys(), &capped());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_patch_writes_present_fields() {
        let k = keys();
        let entries = StatePatch::new()
            .enabled(false)
            .snooze_until(0)
            .snooze_minutes(30)
            .to_entries(&k, &capped());

        assert_eq!(entries.get(&k.enabled), Some(&json!(false)));
        assert_eq!(entries.get(&k.snooze_until), Some(&json!(0)));
        assert_eq!(entries.get(&k.snooze_minutes), Some(&json!(30)));
    }

    #[test]
    fn test_validate_bounds() {
        let policy = capped();
        assert_eq!(policy.validate(0), None);
        assert_eq!(policy.validate(-5), None);
        assert_eq!(policy.validate(1500), None);
        assert_eq!(policy.validate(1440), Some(1440));
        assert_eq!(policy.validate(1), Some(1));

        let uncapped = MinutesPolicy::new(5, None);
        assert_eq!(uncapped.validate(1500), Some(1500));
        assert_eq!(uncapped.validate(0), None);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes(&json!(15)), Some(15));
        assert_eq!(parse_minutes(&json!(2.9)), Some(2));
        assert_eq!(parse_minutes(&json!(-5)), Some(-5));
        assert_eq!(parse_minutes(&json!("90")), Some(90));
        assert_eq!(parse_minutes(&json!(" 15min")), Some(15));
        assert_eq!(parse_minutes(&json!("-7")), Some(-7));
        assert_eq!(parse_minutes(&json!("abc")), None);
        assert_eq!(parse_minutes(&json!("")), None);
        assert_eq!(parse_minutes(&json!(true)), None);
        assert_eq!(parse_minutes(&Value::Null), None);
    }
}
