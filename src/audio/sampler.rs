//! Progress sampler: a cancellable periodic task bound to one session.
//!
//! The sampler only keeps the schedule; the engine performs the actual read
//! of the session position when a tick is due.

use std::time::{Duration, Instant};

use super::types::SessionId;

#[derive(Debug)]
pub struct ProgressSampler {
    interval: Duration,
    armed: Option<Armed>,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    session: SessionId,
    next_due: Instant,
}

impl ProgressSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
        }
    }

    /// Arm for `session` with the first tick due at `now`.
    ///
    /// Any loop bound to another session is dropped first.
    pub fn start(&mut self, session: SessionId, now: Instant) {
        self.armed = Some(Armed {
            session,
            next_due: now,
        });
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Whether a tick for `session` should run at `now`.
    pub fn is_due(&self, session: SessionId, now: Instant) -> bool {
        self.armed
            .is_some_and(|a| a.session == session && now >= a.next_due)
    }

    /// Schedule the following tick one interval after `now`.
    pub fn reschedule(&mut self, now: Instant) {
        if let Some(armed) = self.armed.as_mut() {
            armed.next_due = now + self.interval;
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.armed.map(|a| a.next_due)
    }
}
