//! Deadline-based timers polled by the host.
//!
//! Neither type owns a thread or a callback: the owner asks "has it fired yet"
//! with the current time, and restarting is just overwriting the deadline.

use crate::clock::Millis;

/// Cancellable one-shot timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Millis>,
}

impl Deadline {
    /// Arm (or re-arm) the timer to fire `delay` after `now`.
    pub fn start(&mut self, now: Millis, delay: Millis) {
        self.at = Some(now.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    pub fn at(&self) -> Option<Millis> {
        self.at
    }

    /// Disarm and report `true` once the deadline has been reached.
    pub fn fire(&mut self, now: Millis) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debouncer: every queued value replaces the previous one and
/// restarts the quiet period. The last value comes out once nothing new has
/// arrived for `delay` milliseconds.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Millis,
    pending: Option<(T, Millis)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Millis) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn queue(&mut self, value: T, now: Millis) {
        self.pending = Some((value, now));
    }

    pub fn take_ready(&mut self, now: Millis) -> Option<T> {
        let queued_at = self.pending.as_ref()?.1;
        if now.saturating_sub(queued_at) >= self.delay {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// When the pending value will be released, if any.
    pub fn deadline(&self) -> Option<Millis> {
        self.pending
            .as_ref()
            .map(|(_, queued_at)| queued_at.saturating_add(self.delay))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_fires_once() {
        let mut d = Deadline::default();
        d.start(100, 800);
        assert_eq!(d.at(), Some(900));
        assert!(!d.fire(899));
        assert!(d.fire(900));
        assert!(!d.is_armed());
        assert!(!d.fire(2000));
    }

    #[test]
    fn test_deadline_restart_extends() {
        let mut d = Deadline::default();
        d.start(0, 800);
        d.start(500, 800);
        assert!(!d.fire(800));
        assert!(d.fire(1300));
    }

    #[test]
    fn test_deadline_cancel() {
        let mut d = Deadline::default();
        d.start(0, 10);
        d.cancel();
        assert!(!d.fire(100));
    }

    #[test]
    fn test_debouncer_keeps_last_value() {
        let mut db = Debouncer::new(50);
        db.queue(1, 0);
        db.queue(2, 20);
        db.queue(3, 40);
        assert_eq!(db.take_ready(60), None);
        assert_eq!(db.deadline(), Some(90));
        assert_eq!(db.take_ready(90), Some(3));
        assert!(!db.is_pending());
        assert_eq!(db.take_ready(500), None);
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut db = Debouncer::new(50);
        db.queue("x", 0);
        db.cancel();
        assert_eq!(db.take_ready(100), None);
        assert_eq!(db.deadline(), None);
    }
}
