//! One-shot idle timers.
//!
//! The controller arms at most one timer at a time through the [`IdleTimer`]
//! trait and is told about expirations with
//! [`QuickhelpController::on_timer_fired`](crate::controller::QuickhelpController::on_timer_fired).

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::events::QuickhelpCommand;

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// A source of one-shot deferred callbacks.
pub trait IdleTimer {
    /// Schedule a single expiration after `delay`.
    fn arm(&mut self, delay: Duration) -> TimerId;

    /// Cancel a timer. Safe to call for timers that already fired or were
    /// cancelled before.
    fn cancel(&mut self, id: TimerId);
}

/// Idle timer backed by Tokio tasks.
///
/// Each armed timer is a task that sleeps for the delay and then sends
/// [`QuickhelpCommand::TimerFired`] on the command channel. The host drains
/// the channel on its event loop and hands the commands to the controller.
///
/// A Tokio runtime must be active when [`arm`](IdleTimer::arm) is called.
pub struct TokioIdleTimer {
    command_tx: mpsc::Sender<QuickhelpCommand>,
    next_id: u64,
    pending: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioIdleTimer {
    pub fn new(command_tx: mpsc::Sender<QuickhelpCommand>) -> Self {
        Self {
            command_tx,
            next_id: 0,
            pending: HashMap::new(),
        }
    }

    /// Number of timers armed and not yet cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl IdleTimer for TokioIdleTimer {
    fn arm(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let tx = self.command_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(QuickhelpCommand::TimerFired(id));
        });
        self.pending.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.pending.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioIdleTimer {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
