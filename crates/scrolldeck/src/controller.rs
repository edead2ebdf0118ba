//! Active-slide bookkeeping for a vertically stacked deck.
//!
//! The controller reconciles two writers of the active index: explicit
//! navigation (keys, buttons, dots) and the scroll position of the container.
//! A programmatic navigation opens a settling window during which scroll
//! observations are discarded, so the smooth scroll it triggers cannot drag
//! the index back through the intermediate slides.

use tracing::{debug, trace};

use crate::clock::Millis;
use crate::keys::{self, Intent};
use crate::timer::{Deadline, Debouncer};

/// How long scroll observations are ignored after a programmatic navigation.
/// Approximates the smooth-scroll animation length.
pub const DEFAULT_SETTLE_MS: Millis = 800;

/// Quiet period before a burst of scroll events is evaluated.
pub const DEFAULT_DEBOUNCE_MS: Millis = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub settle_ms: Millis,
    pub debounce_ms: Millis,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_ms: DEFAULT_SETTLE_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Instruction for the host to move its scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub index: usize,
    /// Target offset from the top of the container: `index * viewport_height`.
    pub offset: f32,
    pub smooth: bool,
}

/// Result of feeding a key to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// Mapped key that moved the deck.
    Scroll(ScrollCommand),
    /// Mapped key that produced no movement (boundary or empty deck).
    /// The host must still swallow it.
    Suppressed,
    /// Not a navigation key; leave it to the host.
    Ignored,
}

impl KeyOutcome {
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub fn scroll_command(self) -> Option<ScrollCommand> {
        match self {
            Self::Scroll(cmd) => Some(cmd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollSample {
    position: f32,
    viewport_height: f32,
}

#[derive(Debug, Clone)]
pub struct PresentationController {
    active_index: usize,
    slide_count: usize,
    viewport_height: f32,
    timings: Timings,
    settle: Deadline,
    scroll: Debouncer<ScrollSample>,
    disposed: bool,
}

impl PresentationController {
    pub fn new(slide_count: usize, timings: Timings) -> Self {
        Self {
            active_index: 0,
            slide_count,
            viewport_height: 0.0,
            timings,
            settle: Deadline::default(),
            scroll: Debouncer::new(timings.debounce_ms),
            disposed: false,
        }
    }

    /// Start on `index` (clamped) without opening a settling window.
    pub fn starting_at(mut self, index: usize) -> Self {
        if self.slide_count > 0 {
            self.active_index = index.min(self.slide_count - 1);
        }
        self
    }

    /// `None` when the deck is empty.
    pub fn active_index(&self) -> Option<usize> {
        (self.slide_count > 0).then_some(self.active_index)
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_programmatic_scroll(&self) -> bool {
        self.settle.is_armed()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active_index() == Some(index)
    }

    pub fn can_prev(&self) -> bool {
        !self.disposed && self.slide_count > 0 && self.active_index > 0
    }

    pub fn can_next(&self) -> bool {
        !self.disposed && self.slide_count > 0 && self.active_index + 1 < self.slide_count
    }

    /// Fraction of the deck reached, `(active + 1) / count`; 0 when empty.
    pub fn progress(&self) -> f32 {
        match self.active_index() {
            Some(i) => (i + 1) as f32 / self.slide_count as f32,
            None => 0.0,
        }
    }

    /// `"03 / 12"` style counter. Empty decks read `"00 / 00"`.
    pub fn counter_label(&self) -> String {
        let current = self.active_index().map_or(0, |i| i + 1);
        format!("{current:02} / {:02}", self.slide_count)
    }

    /// Earliest pending timer, for scheduling the next wake-up.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.settle.at(), self.scroll.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height.is_finite() && height > 0.0 {
            self.viewport_height = height;
        }
    }

    /// Resize the deck. The active index is pulled back inside the new range.
    pub fn set_slide_count(&mut self, count: usize) {
        if count == self.slide_count {
            return;
        }
        debug!(from = self.slide_count, to = count, "slide count changed");
        self.slide_count = count;
        if count == 0 {
            self.active_index = 0;
            self.settle.cancel();
            self.scroll.cancel();
        } else if self.active_index >= count {
            self.active_index = count - 1;
            debug!(index = self.active_index, "active slide re-clamped");
        }
    }

    /// Navigate to `index`, clamped into the deck.
    pub fn go_to(&mut self, index: isize, now: Millis) -> Option<ScrollCommand> {
        if self.disposed || self.slide_count == 0 {
            trace!(index, "navigation ignored: no slides");
            return None;
        }
        let target = clamp_index(index, self.slide_count);
        if target != self.active_index {
            debug!(from = self.active_index, to = target, "navigate");
        }
        self.settle.start(now, self.timings.settle_ms);
        self.active_index = target;
        Some(ScrollCommand {
            index: target,
            offset: target as f32 * self.viewport_height,
            smooth: true,
        })
    }

    pub fn next(&mut self, now: Millis) -> Option<ScrollCommand> {
        if !self.can_next() {
            return None;
        }
        self.go_to(self.active_index as isize + 1, now)
    }

    pub fn prev(&mut self, now: Millis) -> Option<ScrollCommand> {
        if !self.can_prev() {
            return None;
        }
        self.go_to(self.active_index as isize - 1, now)
    }

    /// Record a raw scroll event. Evaluation is deferred until the debounce
    /// window passes without another event.
    pub fn on_scroll(&mut self, position: f32, viewport_height: f32, now: Millis) {
        if self.disposed {
            return;
        }
        self.scroll.queue(
            ScrollSample {
                position,
                viewport_height,
            },
            now,
        );
    }

    pub fn on_key(&mut self, key: &str, now: Millis) -> KeyOutcome {
        let command = match keys::intent_for(key) {
            Some(Intent::Next) => self.next(now),
            Some(Intent::Prev) => self.prev(now),
            None => return KeyOutcome::Ignored,
        };
        match command {
            Some(cmd) => KeyOutcome::Scroll(cmd),
            None => KeyOutcome::Suppressed,
        }
    }

    /// Fire whatever timers are due at `now`, earliest first.
    /// Returns `true` if anything observable changed.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.disposed {
            return false;
        }
        let settle_first = match (self.settle.at(), self.scroll.deadline()) {
            (Some(settle), Some(scroll)) => settle <= scroll,
            _ => true,
        };
        if settle_first {
            let settled = self.fire_settle(now);
            self.fire_scroll(now) || settled
        } else {
            let scrolled = self.fire_scroll(now);
            self.fire_settle(now) || scrolled
        }
    }

    /// Cancel every pending timer and stop reacting to input.
    pub fn dispose(&mut self) {
        self.settle.cancel();
        self.scroll.cancel();
        self.disposed = true;
    }

    fn fire_settle(&mut self, now: Millis) -> bool {
        let fired = self.settle.fire(now);
        if fired {
            trace!("programmatic scroll settled");
        }
        fired
    }

    fn fire_scroll(&mut self, now: Millis) -> bool {
        match self.scroll.take_ready(now) {
            Some(sample) => self.apply_scroll(sample),
            None => false,
        }
    }

    fn apply_scroll(&mut self, sample: ScrollSample) -> bool {
        if self.is_programmatic_scroll() {
            trace!(position = sample.position, "scroll ignored while settling");
            return false;
        }
        let ScrollSample {
            position,
            viewport_height,
        } = sample;
        if self.slide_count == 0
            || !position.is_finite()
            || !viewport_height.is_finite()
            || viewport_height <= 0.0
        {
            return false;
        }
        self.viewport_height = viewport_height;

        let candidate = (position / viewport_height).round();
        let candidate = if candidate <= 0.0 {
            0
        } else {
            (candidate as usize).min(self.slide_count - 1)
        };
        if candidate == self.active_index {
            return false;
        }
        debug!(from = self.active_index, to = candidate, "active slide follows scroll");
        self.active_index = candidate;
        true
    }
}

fn clamp_index(index: isize, count: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(count - 1)
    }
}
