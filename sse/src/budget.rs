//! Cooperative execution-time ceilings for long-running streams.
//!
//! A session extends its budget once per pacing cycle, right before it sleeps.
//! The limit passed in must exceed the sleep, otherwise the ceiling can fire while
//! the session is suspended.

use log::*;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// A resettable time ceiling for the context that drives a session.
pub trait ExecutionBudget: Send {
    /// Reset the ceiling so it expires `limit` from now.
    fn extend(&mut self, limit: Duration);
}

/// No ceiling at all. Extending it does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl ExecutionBudget for Unbounded {
    fn extend(&mut self, _limit: Duration) {}
}

/// Session-side handle of a watchdog deadline.
#[derive(Debug)]
pub struct Watchdog {
    deadline: watch::Sender<Instant>,
}

/// Enforcement side of a watchdog deadline.
#[derive(Debug)]
pub struct Expiry {
    deadline: watch::Receiver<Instant>,
}

/// Create a watchdog whose deadline starts `initial` from now.
pub fn watchdog(initial: Duration) -> (Watchdog, Expiry) {
    let (tx, rx) = watch::channel(Instant::now() + initial);
    (Watchdog { deadline: tx }, Expiry { deadline: rx })
}

impl ExecutionBudget for Watchdog {
    fn extend(&mut self, limit: Duration) {
        self.deadline.send_replace(Instant::now() + limit);
    }
}

impl Expiry {
    /// Resolves once the deadline passes without having been extended.
    ///
    /// If the [`Watchdog`] is dropped the last deadline it set still applies.
    pub async fn expired(mut self) {
        loop {
            let deadline = *self.deadline.borrow_and_update();

            tokio::select! {
                _ = sleep_until(deadline) => {
                    // An extension may have landed in the same tick as the sleep.
                    if !matches!(self.deadline.has_changed(), Ok(true)) {
                        debug!("Execution budget exhausted");
                        return;
                    }
                }
                changed = self.deadline.changed() => {
                    if changed.is_err() {
                        let last = *self.deadline.borrow();
                        sleep_until(last).await;
                        debug!("Execution budget exhausted after watchdog was released");
                        return;
                    }
                }
            }
        }
    }
}
