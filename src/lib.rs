//! newtab-focus - Keep newly opened tabs in the foreground.
//!
//! This library is the activation core of a browser extension that brings
//! every new tab (and its window) to the front, with an on/off toggle and a
//! timed snooze.
//!
//! # Architecture
//!
//! The core is host-agnostic. The browser side is reached through narrow
//! collaborator traits:
//!
//! - **Storage**: [`KeyValueStore`] for persistent state and the volatile
//!   startup guard
//! - **Timers**: [`AlarmScheduler`] for the snooze expiry
//! - **Focus**: [`FocusActuator`] to activate tabs and raise windows
//! - **Status**: [`StatusIndicator`] for the toolbar icon and tooltip
//!
//! Key design principles:
//!
//! - One [`EventRouter`] per scope (normal and incognito are independent)
//! - Events are handled one at a time from an `mpsc` inbox
//! - Every state write is followed by a status refresh
//! - Time is injected through [`Clock`], so tests never sleep on wall time
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use newtab_focus::{
//!     EventRouter, MemoryStore, Result, RouterEvent, ScopeConfig, ScopeContext, SystemClock,
//!     TokioAlarms,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let (handle, inbox) = EventRouter::inbox();
//!     let clock = Arc::new(SystemClock);
//!
//!     let context = ScopeContext::builder(ScopeConfig::default())
//!         .local_store(Arc::new(MemoryStore::new()))
//!         .session_store(Arc::new(MemoryStore::new()))
//!         .alarms(Arc::new(TokioAlarms::new(clock.clone(), handle.sender())))
//!         .actuator(Arc::new(BrowserTabs::connect()?))
//!         .clock(clock)
//!         .build()?;
//!     EventRouter::new(context).spawn(inbox);
//!
//!     handle.notify(RouterEvent::Startup).await?;
//!     let reply = handle
//!         .send_command(serde_json::json!({ "type": "snooze", "minutes": 15 }))
//!         .await?;
//!     assert!(reply.is_ok());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`activation`] | Activation state and its state machine |
//! | [`browser`] | Collaborator traits: alarms, focus, status |
//! | [`clock`] | Injectable time source |
//! | [`config`] | Per-scope configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`guard`] | Startup guard |
//! | [`identifiers`] | Tab, window and scope identifiers |
//! | [`protocol`] | Commands, events and replies |
//! | [`router`] | Event router and scope context |
//! | [`store`] | Key-value storage and key layout |

// ============================================================================
// Modules
// ============================================================================

/// Activation state and state machine.
///
/// - [`ActivationState`] - persisted enabled/snooze fields
/// - [`ActivationMachine`] - toggle, snooze, unsnooze, expiry
pub mod activation;

/// Browser collaborators.
///
/// Traits the host implements, plus tokio-backed and logging defaults.
pub mod browser;

/// Injectable time source.
pub mod clock;

/// Per-scope configuration.
///
/// Use [`ScopeConfig::default()`] or deserialize from JSON.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Startup guard against focusing session-restored tabs.
pub mod guard;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing tab and window IDs at compile time.
pub mod identifiers;

/// Commands, router events and replies.
pub mod protocol;

/// Event router and scope context.
///
/// Use [`ScopeContext::builder()`] to assemble a scope.
pub mod router;

/// Key-value storage.
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Activation types
pub use activation::{ActivationMachine, ActivationState, MinutesPolicy, StatePatch};

// Browser types
pub use browser::{
    AlarmScheduler, FocusActuator, FocusDispatcher, LogIndicator, Status, StatusIndicator,
    StatusView, TabInfo, TokioAlarms,
};

// Clock types
pub use clock::{Clock, ManualClock, SystemClock};

// Configuration types
pub use config::ScopeConfig;

// Error types
pub use error::{Error, Result};

// Guard types
pub use guard::StartupGuard;

// Identifier types
pub use identifiers::{Scope, TabId, WindowId};

// Protocol types
pub use protocol::{Command, Reply, RouterEvent, Shortcut};

// Router types
pub use router::{EventRouter, RouterHandle, ScopeContext, ScopeContextBuilder, TabOutcome};

// Storage types
pub use store::{KeyValueStore, MemoryStore, ScopeKeys};
