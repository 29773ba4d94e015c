//! Browser-facing collaborators.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AlarmScheduler`] | Named one-shot timers |
//! | [`FocusActuator`] | Tab activation and window focus |
//! | [`StatusIndicator`] | Toolbar icon and tooltip |
//!
//! The host implements these traits over its extension APIs. The crate ships
//! [`TokioAlarms`] and [`LogIndicator`] for hosts that have no native
//! equivalent.

// ============================================================================
// Submodules
// ============================================================================

/// Named one-shot timers.
pub mod alarm;

/// Tab and window focusing.
pub mod focus;

/// Status indicator.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use alarm::{AlarmScheduler, TokioAlarms};
pub use focus::{FocusActuator, FocusDispatcher, TabInfo};
pub use status::{LogIndicator, Status, StatusIndicator, StatusView};
