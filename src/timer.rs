//! Single-slot deadline guard used for every auto-hide and debounce timer.
//!
//! The shell never holds more than one pending timer per concern: arming a
//! new deadline replaces the previous one, and dropping the guard cancels it.

use std::time::{Duration, Instant};

/// A cancellation-guaranteed handle for one pending deadline.
///
/// At most one deadline is armed at a time. `arm` supersedes any earlier
/// deadline, `fire` consumes it once due, and dropping the guard discards
/// whatever is still pending.
#[derive(Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `delay` from `now`, cancelling any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.at = Some(now + delay);
    }

    /// Cancel the pending deadline. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.at.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Consume the deadline if it is due at `now`. A deadline fires at most
    /// once; firing disarms it.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }

    /// Next wakeup the event loop should honor, if any.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_due() {
        let now = Instant::now();
        let mut deadline = Deadline::new();
        deadline.arm(now, Duration::from_millis(100));

        assert!(!deadline.fire(now + Duration::from_millis(99)));
        assert!(deadline.fire(now + Duration::from_millis(100)));
        assert!(!deadline.fire(now + Duration::from_millis(200)));
        assert!(!deadline.is_armed());
    }

    #[test]
    fn rearming_supersedes_previous_deadline() {
        let now = Instant::now();
        let mut deadline = Deadline::new();
        deadline.arm(now, Duration::from_millis(100));
        deadline.arm(now, Duration::from_millis(500));

        // The first deadline was cancelled by the second arm.
        assert!(!deadline.fire(now + Duration::from_millis(250)));
        assert!(deadline.fire(now + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_reports_whether_a_deadline_was_pending() {
        let now = Instant::now();
        let mut deadline = Deadline::new();
        assert!(!deadline.cancel());
        deadline.arm(now, Duration::from_millis(10));
        assert!(deadline.cancel());
        assert!(!deadline.fire(now + Duration::from_millis(10)));
    }
}
