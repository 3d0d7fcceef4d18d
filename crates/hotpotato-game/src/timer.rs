//! Round timer with explicit cancellation tokens.
//!
//! At most one timer is armed at a time. Arming cancels the previous timer
//! before scheduling the new one, and every firing carries the token it was
//! armed with, so a firing that raced a cancellation can be recognised as
//! stale and dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one arming of the round timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Delivers a token back to the event loop after a delay.
pub trait Scheduler: Send {
    fn schedule(&mut self, token: TimerToken, delay: Duration);
    fn cancel(&mut self, token: TimerToken);
}

/// A delay drawn uniformly from `[min, max)` at millisecond resolution.
///
/// Returns `min` when the range is empty.
pub fn random_delay<R: Rng + ?Sized>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    let lo = min.as_millis() as u64;
    let hi = max.as_millis() as u64;
    if hi <= lo {
        return min;
    }
    Duration::from_millis(rng.gen_range(lo..hi))
}

/// The single pending round timer.
#[derive(Debug)]
pub struct RoundTimer<S: Scheduler> {
    scheduler: S,
    armed: Option<TimerToken>,
    next_id: u64,
}

impl<S: Scheduler> RoundTimer<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            armed: None,
            next_id: 0,
        }
    }

    /// Cancel any armed timer, then arm a new one.
    pub fn arm(&mut self, delay: Duration) -> TimerToken {
        self.cancel();
        self.next_id += 1;
        let token = TimerToken(self.next_id);
        self.scheduler.schedule(token, delay);
        self.armed = Some(token);
        tracing::debug!(%token, delay_ms = delay.as_millis() as u64, "Round timer armed");
        token
    }

    /// Cancel the armed timer, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.armed.take() {
            self.scheduler.cancel(token);
            tracing::debug!(%token, "Round timer cancelled");
        }
    }

    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Consume a firing. Returns `false` for stale tokens.
    pub fn take_if_current(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

// =============================================================================
// Tokio scheduler
// =============================================================================

/// Sleeps on the tokio runtime and sends the token over a channel.
///
/// Must be used from within a runtime. Cancelling aborts the sleeping task.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerToken>,
    tasks: HashMap<TimerToken, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver the event loop should poll.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.tasks.retain(|_, task| !task.is_finished());
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token);
        });
        self.tasks.insert(token, task);
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(task) = self.tasks.remove(&token) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

// =============================================================================
// Manual scheduler
// =============================================================================

#[derive(Debug, Default)]
struct ManualState {
    pending: Vec<(TimerToken, Duration)>,
    cancelled: Vec<TimerToken>,
}

/// Scheduler that never fires on its own. Tests read the pending tokens and
/// deliver them by hand.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// [`RoundTimer`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens scheduled and not cancelled, oldest first.
    pub fn pending(&self) -> Vec<TimerToken> {
        self.state
            .lock()
            .map(|s| s.pending.iter().map(|(t, _)| *t).collect())
            .unwrap_or_default()
    }

    pub fn cancelled(&self) -> Vec<TimerToken> {
        self.state
            .lock()
            .map(|s| s.cancelled.clone())
            .unwrap_or_default()
    }

    /// Delay of a pending token.
    pub fn delay_of(&self, token: TimerToken) -> Option<Duration> {
        self.state.lock().ok().and_then(|s| {
            s.pending
                .iter()
                .find(|(t, _)| *t == token)
                .map(|(_, d)| *d)
        })
    }

    /// Remove and return every pending token, as if their delays elapsed.
    pub fn take_due(&self) -> Vec<TimerToken> {
        self.state
            .lock()
            .map(|mut s| s.pending.drain(..).map(|(t, _)| t).collect())
            .unwrap_or_default()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.pending.push((token, delay));
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Ok(mut s) = self.state.lock() {
            s.pending.retain(|(t, _)| *t != token);
            s.cancelled.push(token);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
