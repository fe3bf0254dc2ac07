//! Scroll-region bookkeeping for the timeline canvas.

use serde::{Deserialize, Serialize};

use kinocut_timeline_model::{Timeline, TimestampNs};

use crate::viewport::{CONTROL_WIDTH, END_PADDING};
use crate::zoom::ZoomState;

/// Horizontal scroll state of the canvas.
///
/// `upper` spans the control strip, the pixel length of the timeline,
/// and the end padding; `value` is the left edge of the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRegion {
    pub upper: f64,
    pub page_size: f64,
    pub value: f64,
    pub step_increment: f64,
    pub page_increment: f64,
}

impl ScrollRegion {
    pub fn new(page_size: f64) -> Self {
        Self {
            upper: page_size,
            page_size,
            value: 0.0,
            step_increment: 0.0,
            page_increment: 0.0,
        }
    }

    /// Recompute the scrollable extent for the timeline's duration at
    /// the current zoom. Increments are fractions of the contents so
    /// paging feels the same at every zoom level.
    pub fn update(&mut self, timeline: &Timeline, zoom: &ZoomState) {
        let contents =
            (zoom.to_pixel(timeline.duration_ns()) + CONTROL_WIDTH + END_PADDING) as f64;
        self.upper = contents.max(self.page_size);
        self.page_increment = contents * 0.9;
        self.step_increment = contents * 0.1;
        self.value = self.value.min(self.max_value());
    }

    fn max_value(&self) -> f64 {
        (self.upper - self.page_size - 1.0).max(0.0)
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(0.0, self.max_value());
    }

    pub fn scroll_page_forward(&mut self) {
        self.set_value(self.value + self.page_increment);
    }

    pub fn scroll_page_back(&mut self) {
        self.set_value(self.value - self.page_increment);
    }

    pub fn scroll_step_forward(&mut self) {
        self.set_value(self.value + self.step_increment);
    }

    pub fn scroll_step_back(&mut self) {
        self.set_value(self.value - self.step_increment);
    }

    /// Center the view on the playhead, clamped to the scrollable range.
    pub fn scroll_to_playhead(&mut self, playhead_ns: TimestampNs, zoom: &ZoomState) {
        let playhead_x = zoom.to_pixel(playhead_ns) as f64;
        self.set_value(playhead_x - self.page_size / 2.0);
    }

    /// Whether the position is currently visible.
    pub fn is_visible(&self, position_ns: TimestampNs, zoom: &ZoomState) -> bool {
        let x = zoom.to_pixel(position_ns) as f64;
        x >= self.value && x < self.value + self.page_size
    }
}
