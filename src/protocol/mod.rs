//! Message types exchanged with the host.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Command` | Page → Router | Toggle, snooze, unsnooze, set default |
//! | `Reply` | Router → Page | `{ ok, error? }` outcome |
//! | `RouterEvent` | Host → Router | Browser events and wrapped commands |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command messages and keyboard shortcuts |
//! | `event` | Router inbox events |
//! | `reply` | Command replies |

// ============================================================================
// Submodules
// ============================================================================

/// Command messages and shortcuts.
pub mod command;

/// Router inbox events.
pub mod event;

/// Command replies.
pub mod reply;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, Shortcut};
pub use event::RouterEvent;
pub use reply::Reply;
