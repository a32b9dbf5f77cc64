//! Periodic redraw scheduling.
//!
//! The ticker only decides *when* to redraw. What is drawn is re-derived from
//! timestamps each time, so a late or skipped tick never shows a wrong value.

use std::time::{Duration, Instant};

/// Shortest accepted interval.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Deadline-based tick scheduler.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// Create a ticker whose first deadline is one interval after `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Create a ticker from a millisecond interval, starting now.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis), Instant::now())
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// How long an event poll may block before the next deadline.
    #[must_use]
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Whether a tick is due at `now`; advances the deadline when it is.
    ///
    /// Deadlines stay on the original phase while the caller keeps up. After a
    /// stall longer than one interval the missed ticks collapse into one and
    /// the schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::from_millis(1000)
    }
}
