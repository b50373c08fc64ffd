//! Timer-gated scroll dispatcher.
//!
//! Scroll events within the delay window collapse into one render that uses
//! only the latest offset. The debouncer holds a single pending slot; a new
//! event replaces it and restarts the delay. Time is passed in explicitly so
//! the event loop owns the clock.

use std::time::{Duration, Instant};

/// Default debounce delay for scroll rendering.
pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    offset: u64,
    deadline: Instant,
}

/// Pending-call slot plus a fixed delay.
#[derive(Debug, Clone)]
pub struct ScrollDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl ScrollDebouncer {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a scroll to `offset` at `now`, replacing any pending one.
    pub fn schedule(&mut self, offset: u64, now: Instant) {
        self.pending = Some(Pending {
            offset,
            deadline: now + self.delay,
        });
    }

    /// Whether a scroll is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending offset if its deadline has passed.
    pub fn take_ready(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.offset)
            }
            _ => None,
        }
    }

    /// Time left until the pending scroll fires, if any.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Drop the pending scroll.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for ScrollDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_DEBOUNCE)
    }
}
