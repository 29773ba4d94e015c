//! Activation state machine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `state` | [`ActivationState`], [`StatePatch`], [`MinutesPolicy`] |
//! | `machine` | [`ActivationMachine`] operations over the store |
//!
//! # States
//!
//! ```text
//!            toggle                     snooze(m)
//!  Disabled ────────► Enabled ◄──────────────────────┐
//!     ▲                 │  ▲                          │
//!     └──── toggle ─────┘  │ toggle / unsnooze /      │
//!                          │ deadline passes          │
//!                          └──────────── Snoozed ◄────┘
//! ```
//!
//! Snoozing from `Disabled` also enables.

// ============================================================================
// Submodules
// ============================================================================

mod machine;
mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use machine::ActivationMachine;
pub use state::{ActivationState, MinutesPolicy, StatePatch, parse_minutes};
