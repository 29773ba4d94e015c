//! Outward status indicator (toolbar icon and tooltip).

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Display;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use serde::Serialize;
use tracing::info;

use crate::activation::ActivationState;
use crate::error::Result;

// ============================================================================
// Status
// ============================================================================

/// Three-valued activation status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// Turned off.
    Disabled,
    /// New tabs are brought to the front.
    Enabled,
    /// Paused until the given epoch milliseconds.
    SnoozedUntil(u64),
}

impl Status {
    /// Derives the status from `state` at `now_ms`.
    #[must_use]
    pub fn from_state(state: &ActivationState, now_ms: u64) -> Self {
        if !state.enabled {
            Self::Disabled
        } else if state.snooze_until > now_ms {
            Self::SnoozedUntil(state.snooze_until)
        } else {
            Self::Enabled
        }
    }

    /// Returns the icon asset for this status.
    #[inline]
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled.png",
            Self::Enabled => "icon.png",
            Self::SnoozedUntil(_) => "snoozed.png",
        }
    }

    /// Returns the tooltip, formatting snooze times in local time.
    #[must_use]
    pub fn tooltip(&self) -> String {
        self.tooltip_in(&Local)
    }

    /// Returns the tooltip, formatting snooze times in `tz`.
    #[must_use]
    pub fn tooltip_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            Self::Disabled => "Disabled".to_string(),
            Self::Enabled => "Enabled".to_string(),
            Self::SnoozedUntil(until) => {
                let time = i64::try_from(*until)
                    .ok()
                    .and_then(|ms| tz.timestamp_millis_opt(ms).single())
                    .map(|at| at.format("%-I:%M %p").to_string())
                    .unwrap_or_else(|| "later".to_string());
                format!("Snoozed until {time}")
            }
        }
    }
}

// ============================================================================
// StatusView
// ============================================================================

/// Everything an indicator needs to render one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// The status itself.
    pub status: Status,
    /// Human-readable tooltip.
    pub title: String,
    /// Icon asset name.
    pub icon: &'static str,
}

impl From<Status> for StatusView {
    fn from(status: Status) -> Self {
        Self {
            status,
            title: status.tooltip(),
            icon: status.icon(),
        }
    }
}

// ============================================================================
// StatusIndicator
// ============================================================================

/// Host surface that displays the current status.
#[async_trait]
pub trait StatusIndicator: Send + Sync {
    /// Replaces the displayed status.
    async fn show(&self, view: &StatusView) -> Result<()>;
}

/// Indicator that only logs; used when the host has no visible surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIndicator;

#[async_trait]
impl StatusIndicator for LogIndicator {
    async fn show(&self, view: &StatusView) -> Result<()> {
        info!(title = %view.title, icon = view.icon, "Status updated");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn state(enabled: bool, snooze_until: u64) -> ActivationState {
        ActivationState {
            enabled,
            snooze_until,
            snooze_minutes: 5,
        }
    }

    #[test]
    fn test_from_state() {
        assert_eq!(Status::from_state(&state(false, 9_999), 0), Status::Disabled);
        assert_eq!(Status::from_state(&state(true, 0), 100), Status::Enabled);
        assert_eq!(
            Status::from_state(&state(true, 500), 100),
            Status::SnoozedUntil(500)
        );
        assert_eq!(Status::from_state(&state(true, 500), 500), Status::Enabled);
    }

    #[test]
    fn test_icons() {
        assert_eq!(Status::Disabled.icon(), "disabled.png");
        assert_eq!(Status::Enabled.icon(), "icon.png");
        assert_eq!(Status::SnoozedUntil(1).icon(), "snoozed.png");
    }

    #[test]
    fn test_tooltip_in_utc() {
        // 2024-01-01T14:05:00Z
        let until = 1_704_117_900_000;
        assert_eq!(
            Status::SnoozedUntil(until).tooltip_in(&Utc),
            "Snoozed until 2:05 PM"
        );
        assert_eq!(Status::Enabled.tooltip_in(&Utc), "Enabled");
        assert_eq!(Status::Disabled.tooltip_in(&Utc), "Disabled");
    }

    #[test]
    fn test_view_serializes() {
        let view = StatusView::from(Status::Enabled);
        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["status"], "enabled");
        assert_eq!(json["icon"], "icon.png");
        assert_eq!(json["title"], "Enabled");

        let snoozed = serde_json::to_value(Status::SnoozedUntil(500)).expect("serialize");
        assert_eq!(snoozed["snoozedUntil"], 500);
    }
}
