//! One-shot named timers.
//!
//! The snooze expiry is a named alarm: scheduling under the same name
//! replaces the previous timer, and clearing cancels it. Expiry is delivered
//! as a [`RouterEvent::AlarmFired`] into the router's inbox, so it is
//! serialized with every other event.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::protocol::RouterEvent;

// ============================================================================
// AlarmScheduler
// ============================================================================

/// Named one-shot timer service.
#[async_trait]
pub trait AlarmScheduler: Send + Sync {
    /// Schedules `name` to fire at `when_ms` (epoch milliseconds).
    ///
    /// Replaces any pending alarm with the same name. A time in the past
    /// fires as soon as possible.
    async fn schedule(&self, name: &str, when_ms: u64) -> Result<()>;

    /// Cancels `name`. Returns `true` if a pending alarm was cancelled.
    async fn clear(&self, name: &str) -> Result<bool>;
}

// ============================================================================
// TokioAlarms
// ============================================================================

/// [`AlarmScheduler`] backed by sleeping tokio tasks.
///
/// # Example
///
/// ```ignore
/// let (tx, rx) = tokio::sync::mpsc::channel(64);
/// let alarms = TokioAlarms::new(Arc::new(SystemClock), &tx);
/// ```
///
/// Only a weak sender is kept, so pending alarms do not keep the router
/// inbox open once every [`crate::RouterHandle`] is gone.
pub struct TokioAlarms {
    /// Time source used to turn deadlines into sleep durations.
    clock: Arc<dyn Clock>,
    /// Router inbox receiving expiry events.
    sender: mpsc::WeakSender<RouterEvent>,
    /// Pending timer tasks by alarm name.
    timers: Mutex<FxHashMap<String, JoinHandle<()>>>,
}

impl TokioAlarms {
    /// Creates a scheduler delivering expiries into `sender`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, sender: &mpsc::Sender<RouterEvent>) -> Self {
        Self {
            clock,
            sender: sender.downgrade(),
            timers: Mutex::new(FxHashMap::default()),
        }
    }

    /// Returns the number of alarms that have not fired or been cleared.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers
            .lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

#[async_trait]
impl AlarmScheduler for TokioAlarms {
    async fn schedule(&self, name: &str, when_ms: u64) -> Result<()> {
        let delay = Duration::from_millis(when_ms.saturating_sub(self.clock.now_ms()));
        let sender = self.sender.clone();
        let alarm = name.to_string();

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            debug!(alarm = %alarm, "Alarm fired");
            let delivered = match sender.upgrade() {
                Some(sender) => sender
                    .send(RouterEvent::AlarmFired { name: alarm })
                    .await
                    .is_ok(),
                None => false,
            };
            if !delivered {
                debug!("Router inbox closed, dropping alarm");
            }
        });

        if let Some(previous) = self.timers.lock().insert(name.to_string(), handle) {
            previous.abort();
        }

        debug!(alarm = %name, delay_ms = delay.as_millis() as u64, "Alarm scheduled");
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<bool> {
        let Some(handle) = self.timers.lock().remove(name) else {
            return Ok(false);
        };

        let pending = !handle.is_finished();
        handle.abort();
        debug!(alarm = %name, pending, "Alarm cleared");
        Ok(pending)
    }
}

impl Drop for TokioAlarms {
    fn drop(&mut self) {
        for (_, handle) in self.timers.lock().drain() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    type Setup = (
        TokioAlarms,
        mpsc::Sender<RouterEvent>,
        mpsc::Receiver<RouterEvent>,
    );

    fn setup(now_ms: u64) -> Setup {
        let (tx, rx) = mpsc::channel(8);
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(now_ms));
        (TokioAlarms::new(clock, &tx), tx, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_fires_after_delay() {
        let (alarms, _tx, mut rx) = setup(1_000);
        alarms.schedule("snooze-expire-normal", 61_000).await.unwrap();
        assert_eq!(alarms.pending(), 1);

        let event = rx.recv().await.expect("alarm event");
        match event {
            RouterEvent::AlarmFired { name } => assert_eq!(name, "snooze-expire-normal"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_alarm() {
        let (alarms, _tx, mut rx) = setup(0);
        alarms.schedule("a", 5_000).await.unwrap();

        assert!(alarms.clear("a").await.unwrap());
        assert!(!alarms.clear("a").await.unwrap());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_previous() {
        let (alarms, _tx, mut rx) = setup(0);
        alarms.schedule("a", 1_000).await.unwrap();
        alarms.schedule("a", 60_000).await.unwrap();
        assert_eq!(alarms.pending(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(matches!(
            rx.try_recv(),
            Ok(RouterEvent::AlarmFired { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_inbox_drops_alarm() {
        let (alarms, tx, mut rx) = setup(0);
        alarms.schedule("a", 1_000).await.unwrap();
        drop(tx);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_fires_immediately() {
        let (alarms, _tx, mut rx) = setup(10_000);
        alarms.schedule("late", 5_000).await.unwrap();
        assert!(rx.recv().await.is_some());
    }
}
