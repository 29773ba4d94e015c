//! Event routing for one activation scope.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `context` | [`ScopeContext`] and its builder |
//! | `core` | [`EventRouter`] loop and [`RouterHandle`] |
//!
//! # Tab Decisions
//!
//! | Check (in order) | Outcome |
//! |------------------|---------|
//! | startup guard active | [`TabOutcome::GuardActive`] |
//! | tab discarded | [`TabOutcome::Discarded`] |
//! | state unreadable | [`TabOutcome::StateUnavailable`] |
//! | disabled or snoozed | [`TabOutcome::Inactive`] |
//! | tab already active | [`TabOutcome::AlreadyActive`] |
//! | otherwise | [`TabOutcome::Focused`] |

// ============================================================================
// Submodules
// ============================================================================

/// Per-scope context and builder.
pub mod context;

/// Event loop and handlers.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{ScopeContext, ScopeContextBuilder};
pub use core::{DEFAULT_INBOX_CAPACITY, EventRouter, RouterHandle, TabOutcome};
