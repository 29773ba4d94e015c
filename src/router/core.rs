//! Event router and its inbox handle.
//!
//! The router owns one [`ScopeContext`] and handles every event for that
//! scope on a single task, so state reads and writes never interleave.
//!
//! # Event Loop
//!
//! ```text
//! RouterHandle ──┐
//! TokioAlarms ───┼──> mpsc inbox ──> EventRouter::run ──> dispatch
//! host glue ─────┘                                          │
//!                                    oneshot Reply <────────┘ (messages)
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::activation::parse_minutes;
use crate::browser::TabInfo;
use crate::error::{Error, Result};
use crate::protocol::{Command, Reply, RouterEvent, Shortcut};

use super::context::ScopeContext;

// ============================================================================
// Constants
// ============================================================================

/// Inbox capacity used by [`EventRouter::inbox`].
pub const DEFAULT_INBOX_CAPACITY: usize = 64;

// ============================================================================
// TabOutcome
// ============================================================================

/// What the router decided for a created tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    /// Startup guard suppressed focusing.
    GuardActive,
    /// Tab is discarded.
    Discarded,
    /// Scope is disabled or snoozed.
    Inactive,
    /// Tab is already in front.
    AlreadyActive,
    /// Focusing was dispatched.
    Focused,
    /// State could not be read; nothing was done.
    StateUnavailable,
}

// ============================================================================
// EventRouter
// ============================================================================

/// Serialized handler for one scope's events.
#[derive(Debug, Clone)]
pub struct EventRouter {
    ctx: Arc<ScopeContext>,
}

impl EventRouter {
    /// Creates a router over `ctx`.
    #[must_use]
    pub fn new(ctx: ScopeContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Returns the scope context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &ScopeContext {
        &self.ctx
    }

    /// Creates an inbox with [`DEFAULT_INBOX_CAPACITY`].
    #[must_use]
    pub fn inbox() -> (RouterHandle, mpsc::Receiver<RouterEvent>) {
        Self::inbox_with_capacity(DEFAULT_INBOX_CAPACITY)
    }

    /// Creates an inbox holding up to `capacity` queued events.
    #[must_use]
    pub fn inbox_with_capacity(capacity: usize) -> (RouterHandle, mpsc::Receiver<RouterEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (RouterHandle { sender }, receiver)
    }

    /// Runs the event loop on a new task.
    pub fn spawn(self, inbox: mpsc::Receiver<RouterEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(inbox))
    }

    /// Handles events one at a time until every sender is gone.
    pub async fn run(self, mut inbox: mpsc::Receiver<RouterEvent>) {
        info!(scope = %self.ctx.config().scope, "Event router started");

        while let Some(event) = inbox.recv().await {
            self.dispatch(event).await;
        }

        debug!(scope = %self.ctx.config().scope, "Event router inbox closed");
    }

    /// Handles a single event.
    pub async fn dispatch(&self, event: RouterEvent) {
        trace!(kind = event.kind(), "Dispatching event");

        match event {
            RouterEvent::Installed => self.on_installed().await,
            RouterEvent::Startup => self.on_startup().await,
            RouterEvent::TabCreated(tab) => {
                self.on_tab_created(&tab).await;
            }
            RouterEvent::AlarmFired { name } => {
                self.on_alarm(&name).await;
            }
            RouterEvent::ActionClicked => self.on_action_clicked().await,
            RouterEvent::Shortcut { name } => self.on_shortcut(&name).await,
            RouterEvent::Message {
                payload,
                respond_to,
            } => {
                let reply = self.handle_message(payload).await;
                if let Some(tx) = respond_to
                    && tx.send(reply).is_err()
                {
                    debug!("Reply dropped, caller went away");
                }
            }
        }
    }
}

// ============================================================================
// EventRouter - Lifecycle Events
// ============================================================================

impl EventRouter {
    /// Extension installed or updated: show the current status.
    pub async fn on_installed(&self) {
        self.ctx.machine().refresh_status().await;
    }

    /// Browser started: arm the startup guard, then show the status.
    pub async fn on_startup(&self) {
        self.ctx.guard().arm().await;
        self.ctx.machine().refresh_status().await;
    }
}

// ============================================================================
// EventRouter - Tab Events
// ============================================================================

impl EventRouter {
    /// Brings a new tab to the front unless something says otherwise.
    ///
    /// Focusing runs on a detached task; the outcome only reports the
    /// decision.
    pub async fn on_tab_created(&self, tab: &TabInfo) -> TabOutcome {
        let outcome = self.decide(tab).await;
        if outcome == TabOutcome::Focused {
            self.ctx.focus().bring_to_front(tab);
        }

        debug!(tab_id = %tab.id, ?outcome, "Tab created");
        outcome
    }

    async fn decide(&self, tab: &TabInfo) -> TabOutcome {
        if self.ctx.guard().check().await {
            return TabOutcome::GuardActive;
        }
        if tab.discarded {
            return TabOutcome::Discarded;
        }

        let machine = self.ctx.machine();
        let state = match machine.state().await {
            Ok(state) => state,
            Err(e) => {
                warn!(tab_id = %tab.id, error = %e, "State unreadable, tab left alone");
                return TabOutcome::StateUnavailable;
            }
        };

        if !state.is_active(machine.now_ms()) {
            TabOutcome::Inactive
        } else if tab.active {
            TabOutcome::AlreadyActive
        } else {
            TabOutcome::Focused
        }
    }
}

// ============================================================================
// EventRouter - Alarms
// ============================================================================

impl EventRouter {
    /// Clears an expired snooze. Returns `true` if state changed.
    ///
    /// Alarms with other names are ignored.
    pub async fn on_alarm(&self, name: &str) -> bool {
        let machine = self.ctx.machine();
        if name != machine.alarm_name() {
            trace!(alarm = %name, "Alarm for another scope ignored");
            return false;
        }

        match machine.expire_snooze().await {
            Ok(expired) => expired,
            Err(e) => {
                warn!(alarm = %name, error = %e, "Snooze expiry failed");
                false
            }
        }
    }
}

// ============================================================================
// EventRouter - User Input
// ============================================================================

impl EventRouter {
    /// Toolbar button: toggle.
    pub async fn on_action_clicked(&self) {
        if let Err(e) = self.ctx.machine().toggle().await {
            warn!(error = %e, "Toggle from action click failed");
        }
    }

    /// Keyboard command by manifest name. Unknown names are ignored.
    pub async fn on_shortcut(&self, name: &str) {
        let result = match Shortcut::from_name(name) {
            Some(Shortcut::ToggleEnabled) => self.ctx.machine().toggle().await,
            Some(Shortcut::Snooze) => self.ctx.machine().snooze(None).await.map(drop),
            None => {
                debug!(shortcut = %name, "Unknown shortcut ignored");
                return;
            }
        };

        if let Err(e) = result {
            warn!(shortcut = %name, error = %e, "Shortcut failed");
        }
    }

    /// Parses and runs a command message.
    pub async fn handle_message(&self, payload: Value) -> Reply {
        match Command::from_value(payload) {
            Ok(command) => self.handle_command(command).await,
            Err(e) => {
                debug!(error = %e, "Message rejected");
                Reply::error(e.to_string())
            }
        }
    }

    /// Runs a parsed command.
    pub async fn handle_command(&self, command: Command) -> Reply {
        let name = command.name();
        let machine = self.ctx.machine();

        let result = match command {
            Command::Toggle => machine.toggle().await,
            Command::Snooze { minutes } => self.snooze_for(minutes).await,
            Command::Unsnooze => machine.unsnooze().await,
            Command::SetSnoozeMinutes { minutes } => self.set_default_minutes(&minutes).await,
        };

        match &result {
            Ok(()) => debug!(command = name, "Command handled"),
            Err(e) if e.is_validation_error() => debug!(command = name, error = %e, "Command rejected"),
            Err(e) => warn!(command = name, error = %e, "Command failed"),
        }
        Reply::from(result)
    }

    async fn snooze_for(&self, minutes: Option<Value>) -> Result<()> {
        let machine = self.ctx.machine();
        let minutes = match minutes {
            None | Some(Value::Null) => None,
            Some(value) => {
                let valid = machine
                    .policy()
                    .validate_value(&value)
                    .ok_or_else(|| Error::invalid_minutes(&value))?;
                Some(i64::from(valid))
            }
        };

        machine.snooze(minutes).await.map(drop)
    }

    async fn set_default_minutes(&self, minutes: &Value) -> Result<()> {
        let raw = parse_minutes(minutes).ok_or_else(|| Error::invalid_minutes(minutes))?;
        self.ctx.machine().set_snooze_minutes(raw).await.map(drop)
    }
}

// ============================================================================
// RouterHandle
// ============================================================================

/// Cloneable entry point into a router's inbox.
///
/// The router stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct RouterHandle {
    sender: mpsc::Sender<RouterEvent>,
}

impl RouterHandle {
    /// Returns the underlying sender, e.g. for [`crate::TokioAlarms::new`].
    #[inline]
    #[must_use]
    pub fn sender(&self) -> &mpsc::Sender<RouterEvent> {
        &self.sender
    }

    /// Returns `true` once the router has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queues an event without waiting for it to be handled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InboxClosed`] if the router has stopped.
    pub async fn notify(&self, event: RouterEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| Error::InboxClosed)
    }

    /// Sends a command message and waits for the reply.
    ///
    /// # Errors
    ///
    /// - [`Error::InboxClosed`] if the router has stopped
    /// - [`Error::ChannelClosed`] if the router dropped the reply
    pub async fn send_command(&self, payload: Value) -> Result<Reply> {
        let (event, reply) = RouterEvent::message(payload);
        self.notify(event).await?;
        Ok(reply.await?)
    }
}

// ============================================================================
// Tests
// ============================================================================
