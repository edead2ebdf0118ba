use std::ops::Range;

use crate::clock::Millis;

/// Fraction of the remaining distance covered per frame by smooth scrolling.
const SMOOTH_STEP: f32 = 0.15;
/// Distance under which an animation snaps to its target.
const ARRIVE_EPSILON: f32 = 0.5;
/// Idle time after the last wheel event before snapping to the nearest slide.
const SNAP_DELAY_MS: Millis = 150;

/// Vertical scroll model of a stack of full-viewport slides.
///
/// Slide `i` occupies `[i * h, (i + 1) * h)`. The offset moves either by user
/// scrolling (immediately) or toward a target (smoothly, frame by frame).
/// After user scrolling stops the container snaps to the nearest slide.
#[derive(Debug, Clone)]
pub struct ScrollContainer {
    offset: f32,
    target: Option<f32>,
    viewport_height: f32,
    slide_count: usize,
    last_user_scroll: Option<Millis>,
}

impl ScrollContainer {
    pub fn new(slide_count: usize) -> Self {
        Self {
            offset: 0.0,
            target: None,
            viewport_height: 0.0,
            slide_count,
            last_user_scroll: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some() || self.last_user_scroll.is_some()
    }

    pub fn max_offset(&self) -> f32 {
        self.slide_count.saturating_sub(1) as f32 * self.viewport_height
    }

    /// Update geometry. On a height change the offset keeps the same slide
    /// position so resizing never drifts to another slide.
    pub fn set_viewport(&mut self, height: f32, slide_count: usize) {
        if !height.is_finite() || height <= 0.0 {
            return;
        }
        if self.viewport_height > 0.0 && (height - self.viewport_height).abs() > f32::EPSILON {
            let ratio = height / self.viewport_height;
            self.offset *= ratio;
            self.target = self.target.map(|t| t * ratio);
        }
        self.viewport_height = height;
        self.slide_count = slide_count;
        self.offset = self.offset.clamp(0.0, self.max_offset());
        self.target = self.target.map(|t| t.clamp(0.0, self.max_offset()));
    }

    /// User scroll by `delta` pixels (positive scrolls down).
    pub fn scroll_by(&mut self, delta: f32, now: Millis) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        self.target = None;
        self.last_user_scroll = Some(now);
        let before = self.offset;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
        self.offset != before
    }

    /// Move to `offset`, animated when `smooth`.
    pub fn scroll_to(&mut self, offset: f32, smooth: bool) {
        let offset = offset.clamp(0.0, self.max_offset());
        self.last_user_scroll = None;
        if smooth {
            self.target = Some(offset);
        } else {
            self.target = None;
            self.offset = offset;
        }
    }

    /// Advance animations by one frame. Returns `true` if the offset moved.
    pub fn step(&mut self, now: Millis) -> bool {
        if self.target.is_none() {
            if let Some(last) = self.last_user_scroll {
                if now.saturating_sub(last) >= SNAP_DELAY_MS {
                    self.last_user_scroll = None;
                    let nearest = self.nearest_slide_offset();
                    if (nearest - self.offset).abs() > ARRIVE_EPSILON {
                        self.target = Some(nearest);
                    }
                }
            }
        }

        let Some(target) = self.target else {
            return false;
        };
        let diff = target - self.offset;
        if diff.abs() < ARRIVE_EPSILON {
            self.offset = target;
            self.target = None;
        } else {
            self.offset += diff * SMOOTH_STEP;
        }
        diff != 0.0
    }

    /// Top edge of slide `index` relative to the viewport.
    pub fn slide_top(&self, index: usize) -> f32 {
        index as f32 * self.viewport_height - self.offset
    }

    /// Slides intersecting the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        if self.viewport_height <= 0.0 || self.slide_count == 0 {
            return 0..0;
        }
        let first = (self.offset / self.viewport_height).floor() as usize;
        let last = ((self.offset + self.viewport_height) / self.viewport_height).ceil() as usize;
        first.min(self.slide_count)..last.min(self.slide_count)
    }

    fn nearest_slide_offset(&self) -> f32 {
        if self.viewport_height <= 0.0 {
            return 0.0;
        }
        let index = (self.offset / self.viewport_height).round();
        (index * self.viewport_height).clamp(0.0, self.max_offset())
    }
}
