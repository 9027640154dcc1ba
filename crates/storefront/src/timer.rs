//! Cancellable one-shot timers that post events back to the session loop.
//!
//! A [`Timer`] owns at most one pending tokio task. Starting it again aborts
//! the pending task, so a burst of starts inside the delay collapses into a
//! single event carrying the latest [`Ticket`]. Because an event may already
//! sit in the channel when the timer is restarted or cancelled, receivers
//! check it with [`Timer::accept`] before acting on it.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Identifies one start of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A restartable delayed event.
#[derive(Debug)]
pub struct Timer<E> {
    delay: Duration,
    events: UnboundedSender<E>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
    armed: bool,
}

impl<E: Send + 'static> Timer<E> {
    /// Create an idle timer delivering into `events`.
    #[must_use]
    pub const fn new(delay: Duration, events: UnboundedSender<E>) -> Self {
        Self {
            delay,
            events,
            pending: None,
            generation: 0,
            armed: false,
        }
    }

    /// Start (or restart) the timer.
    ///
    /// Any pending firing is cancelled. `make` builds the event from the new
    /// ticket. Must be called from within a tokio runtime.
    pub fn start(&mut self, make: impl FnOnce(Ticket) -> E) -> Ticket {
        self.abort_pending();
        self.generation += 1;
        self.armed = true;

        let ticket = Ticket(self.generation);
        let event = make(ticket);
        let events = self.events.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone only when the session is shutting down.
            let _ = events.send(event);
        }));
        ticket
    }

    /// Cancel the pending firing, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.armed;
        self.abort_pending();
        self.armed = false;
        was_armed
    }

    /// Whether a started firing has not yet been accepted or cancelled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.armed
    }

    /// Claim a fired ticket.
    ///
    /// Returns `true` exactly once for the latest start; stale or cancelled
    /// tickets return `false`.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.armed && ticket.0 == self.generation {
            self.armed = false;
            self.pending = None;
            true
        } else {
            false
        }
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<E> Drop for Timer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
