//! Discrete zoom levels mapping timeline time to screen pixels.
//!
//! Zoom is an injected object, not process-global state: every engine
//! that needs time/pixel conversion holds (or borrows) a [`ZoomState`].
//! Listeners are notified synchronously from the mutation call so the
//! viewport reflows before the caller observes the new ratio.

use kinocut_common::clock::NANOS_PER_SECOND;
use kinocut_timeline_model::TimestampNs;

/// Number of discrete zoom levels, 0 (furthest out) to `ZOOM_LEVELS - 1`.
pub const ZOOM_LEVELS: u32 = 79;

/// Level selected for a fresh project.
pub const DEFAULT_ZOOM_LEVEL: u32 = 30;

const MIN_PIXELS_PER_SECOND: f64 = 0.05;
const GROWTH_PER_LEVEL: f64 = 1.2;

/// Pixels of screen space covering one second of timeline at `level`.
///
/// The progression is geometric, so each step scales the view by the
/// same factor regardless of where on the range it happens.
pub fn pixels_per_second(level: u32) -> f64 {
    let level = level.min(ZOOM_LEVELS - 1);
    MIN_PIXELS_PER_SECOND * GROWTH_PER_LEVEL.powi(level as i32)
}

type ZoomListener = Box<dyn FnMut(f64) + Send>;

/// The current zoom level plus change subscribers.
pub struct ZoomState {
    level: u32,
    /// Set when the level was chosen to fit the whole timeline; cleared
    /// by any manual zoom so later duration changes stop re-fitting.
    zoomed_fitted: bool,
    listeners: Vec<ZoomListener>,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomState {
    pub fn new() -> Self {
        Self {
            level: DEFAULT_ZOOM_LEVEL,
            zoomed_fitted: true,
            listeners: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current pixels-per-second ratio.
    pub fn ratio(&self) -> f64 {
        pixels_per_second(self.level)
    }

    pub fn zoomed_fitted(&self) -> bool {
        self.zoomed_fitted
    }

    /// Register a listener invoked synchronously with the new ratio on
    /// every effective level change.
    pub fn subscribe(&mut self, listener: impl FnMut(f64) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Jump to a level. Out-of-range values clamp; a no-change set does
    /// not notify. Manual zooming drops the best-fit flag.
    pub fn set_level(&mut self, level: u32) {
        self.zoomed_fitted = false;
        self.apply_level(level);
    }

    pub fn zoom_in(&mut self) {
        self.set_level(self.level.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_level(self.level.saturating_sub(1));
    }

    /// Pick the highest level at which the whole duration fits in
    /// `viewport_width` pixels and mark the view as fitted. An empty
    /// timeline keeps the current level.
    pub fn zoom_fit(&mut self, duration_ns: TimestampNs, viewport_width: f64) {
        if duration_ns > 0 {
            self.apply_level(compute_best_fit_zoom(duration_ns, viewport_width));
        }
        self.zoomed_fitted = true;
    }

    fn apply_level(&mut self, level: u32) {
        let level = level.min(ZOOM_LEVELS - 1);
        if level == self.level {
            return;
        }
        self.level = level;
        let ratio = self.ratio();
        tracing::debug!(level, ratio, "zoom level changed");
        for listener in &mut self.listeners {
            listener(ratio);
        }
    }

    /// Timeline position to canvas pixel (rounded).
    pub fn to_pixel(&self, position_ns: TimestampNs) -> i64 {
        (position_ns as f64 / NANOS_PER_SECOND as f64 * self.ratio()).round() as i64
    }

    /// Canvas pixel back to a timeline position. Negative pixels clamp
    /// to the origin.
    pub fn to_ns(&self, pixel: i64) -> TimestampNs {
        if pixel <= 0 {
            return 0;
        }
        (pixel as f64 / self.ratio() * NANOS_PER_SECOND as f64).round() as TimestampNs
    }

    /// Pixel length of a duration at the current level.
    pub fn duration_to_pixels(&self, duration_ns: TimestampNs) -> i64 {
        self.to_pixel(duration_ns)
    }
}

impl std::fmt::Debug for ZoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomState")
            .field("level", &self.level)
            .field("zoomed_fitted", &self.zoomed_fitted)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Highest level at which `duration_ns` renders within `viewport_width`
/// pixels.
///
/// The duration is padded by one second minus one nanosecond so the
/// final second stays fully in view. Duration 0 returns level 0.
pub fn compute_best_fit_zoom(duration_ns: TimestampNs, viewport_width: f64) -> u32 {
    if duration_ns == 0 {
        return 0;
    }
    let padded_ns = duration_ns + NANOS_PER_SECOND - 1;
    let duration_secs = padded_ns as f64 / NANOS_PER_SECOND as f64;
    let mut best = 0;
    for level in 0..ZOOM_LEVELS {
        if duration_secs * pixels_per_second(level) <= viewport_width {
            best = level;
        } else {
            break;
        }
    }
    best
}
