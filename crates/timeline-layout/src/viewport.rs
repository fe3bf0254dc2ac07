//! The viewport engine: screen geometry for every timeline element.
//!
//! The engine binds to a timeline and mirrors it as lightweight screen
//! proxies. It never mutates the model; it consumes the model's event
//! queue (drained by the caller, delivered here one at a time, each
//! handled to completion before the next) and keeps pixel geometry
//! consistent with the current zoom level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kinocut_timeline_model::{
    Clip, ClipId, ClipKind, ElementField, Timeline, TimelineEvent, TimestampNs, TrackType,
};

use crate::zoom::ZoomState;

/// Width of the layer-control strip left of the canvas.
pub const CONTROL_WIDTH: i64 = 250;
/// Height of one expanded layer row.
pub const EXPANDED_SIZE: i64 = 65;
/// Vertical gap between layer rows.
pub const SPACING: i64 = 10;
/// Blank canvas kept to the right of the last clip.
pub const END_PADDING: i64 = 500;
/// Playhead line width.
pub const PLAYHEAD_WIDTH: i64 = 2;
/// Snap-indicator line width.
pub const SNAP_INDICATOR_WIDTH: i64 = 3;

/// Screen proxy of one timeline clip.
///
/// `x`/`width` are canvas-local pixels (the control strip is outside
/// the canvas); `z` orders overlapping draws, transitions below
/// regular clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenElement {
    pub clip: ClipId,
    pub track_type: TrackType,
    pub kind: ClipKind,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub z: u32,
    /// Set while the user drags this element; renderers reposition it
    /// immediately instead of easing toward the new geometry.
    #[serde(default)]
    pub dragged: bool,
}

/// Geometry engine bound to one timeline.
#[derive(Debug, Default)]
pub struct ViewportEngine {
    elements: BTreeMap<ClipId, ScreenElement>,
    playhead_ns: TimestampNs,
    snap_position_ns: Option<TimestampNs>,
    bound: bool,
}

impl ViewportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a timeline, discarding any previous binding's proxies
    /// and building fresh ones from the current model state.
    pub fn bind(&mut self, timeline: &Timeline, zoom: &ZoomState) {
        self.elements.clear();
        self.snap_position_ns = None;
        self.bound = true;
        for layer in timeline.layers() {
            for clip in &layer.clips {
                self.insert_proxy(clip, layer.priority, timeline.layer_count(), zoom);
            }
        }
        tracing::debug!(elements = self.elements.len(), "viewport bound");
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Current proxies, keyed by clip.
    pub fn elements(&self) -> &BTreeMap<ClipId, ScreenElement> {
        &self.elements
    }

    pub fn element(&self, clip: ClipId) -> Option<&ScreenElement> {
        self.elements.get(&clip)
    }

    /// Apply one model event. Events must arrive in queue order.
    pub fn handle_event(&mut self, timeline: &Timeline, event: &TimelineEvent, zoom: &ZoomState) {
        if !self.bound {
            tracing::warn!(?event, "event delivered to an unbound viewport");
            return;
        }
        match event {
            TimelineEvent::ElementAdded { clip, layer } => {
                let Some(layer) = timeline.layer(*layer) else {
                    tracing::warn!(layer = layer.0, "element added on unknown layer");
                    return;
                };
                if let Some(clip) = layer.clips.iter().find(|c| c.id == *clip) {
                    self.insert_proxy(clip, layer.priority, timeline.layer_count(), zoom);
                }
            }
            TimelineEvent::ElementRemoved { clip } => {
                if self.elements.remove(clip).is_none() {
                    tracing::warn!(clip = clip.0, "removed clip had no proxy");
                }
            }
            TimelineEvent::ElementChanged { clip, field } => {
                self.refresh_element(timeline, *clip, *field, zoom);
            }
            TimelineEvent::LayerAdded { .. }
            | TimelineEvent::LayerRemoved { .. }
            | TimelineEvent::LayersReordered => {
                // Row positions depend on every layer's priority and on
                // the layer count (audio rows stack below all video
                // rows), so any layer change reflows vertically.
                self.reflow_vertical(timeline);
            }
            TimelineEvent::SnappingStarted { position_ns } => {
                // Position 0 is indistinguishable from "ended" on the
                // wire; hide the indicator.
                self.snap_position_ns = if *position_ns == 0 {
                    None
                } else {
                    Some(*position_ns)
                };
            }
            TimelineEvent::SnappingEnded => {
                self.snap_position_ns = None;
            }
            TimelineEvent::TrackAdded { .. }
            | TimelineEvent::TrackRemoved { .. }
            | TimelineEvent::DurationChanged { .. } => {}
        }
    }

    /// Reflow horizontal geometry after a zoom change.
    ///
    /// One pass, recomputing each element's `x` and `width` exactly
    /// once. Returns the number of elements touched.
    pub fn on_zoom_changed(&mut self, zoom: &ZoomState, timeline: &Timeline) -> usize {
        let mut touched = 0;
        for layer in timeline.layers() {
            for clip in &layer.clips {
                if let Some(element) = self.elements.get_mut(&clip.id) {
                    element.x = zoom.to_pixel(clip.start_ns);
                    element.width = zoom.duration_to_pixels(clip.duration_ns);
                    touched += 1;
                }
            }
        }
        touched
    }

    /// Mark an element as being dragged (or released). Unknown clips
    /// are a no-op.
    pub fn set_dragged(&mut self, clip: ClipId, dragged: bool) {
        if let Some(element) = self.elements.get_mut(&clip) {
            element.dragged = dragged;
        }
    }

    // ---- Playhead and snap indicator ----------------------------------

    pub fn set_playhead(&mut self, position_ns: TimestampNs) {
        self.playhead_ns = position_ns;
    }

    pub fn playhead_ns(&self) -> TimestampNs {
        self.playhead_ns
    }

    /// Canvas x of the playhead line at the current zoom.
    pub fn playhead_x(&self, zoom: &ZoomState) -> i64 {
        zoom.to_pixel(self.playhead_ns)
    }

    /// Canvas x of the snap indicator, or `None` while hidden.
    pub fn snap_indicator_x(&self, zoom: &ZoomState) -> Option<i64> {
        self.snap_position_ns.map(|ns| zoom.to_pixel(ns))
    }

    pub fn snap_position_ns(&self) -> Option<TimestampNs> {
        self.snap_position_ns
    }

    // ---- Geometry ------------------------------------------------------

    fn insert_proxy(&mut self, clip: &Clip, priority: u32, layer_count: usize, zoom: &ZoomState) {
        let element = ScreenElement {
            clip: clip.id,
            track_type: clip.track_type,
            kind: clip.kind,
            x: zoom.to_pixel(clip.start_ns),
            y: row_y(priority, clip.track_type, layer_count),
            width: zoom.duration_to_pixels(clip.duration_ns),
            height: EXPANDED_SIZE,
            z: match clip.kind {
                ClipKind::Transition => 0,
                ClipKind::Source => 1,
            },
            dragged: false,
        };
        self.elements.insert(clip.id, element);
    }

    fn refresh_element(
        &mut self,
        timeline: &Timeline,
        id: ClipId,
        field: ElementField,
        zoom: &ZoomState,
    ) {
        let Some((_, clip)) = timeline.clip(id) else {
            tracing::warn!(clip = id.0, "changed clip no longer in the model");
            return;
        };
        let Some(element) = self.elements.get_mut(&id) else {
            tracing::warn!(clip = id.0, "changed clip had no proxy");
            return;
        };
        match field {
            ElementField::Start => element.x = zoom.to_pixel(clip.start_ns),
            ElementField::Duration => element.width = zoom.duration_to_pixels(clip.duration_ns),
            // The in-point shifts source material, not screen geometry.
            ElementField::InPoint => {}
        }
    }

    fn reflow_vertical(&mut self, timeline: &Timeline) {
        let layer_count = timeline.layer_count();
        let mut stale: Vec<ClipId> = self.elements.keys().copied().collect();
        for layer in timeline.layers() {
            for clip in &layer.clips {
                if let Some(element) = self.elements.get_mut(&clip.id) {
                    element.y = row_y(layer.priority, clip.track_type, layer_count);
                    stale.retain(|id| *id != clip.id);
                }
            }
        }
        // Proxies whose layer vanished go with it.
        for id in stale {
            self.elements.remove(&id);
        }
    }
}

/// Top edge of the row for a layer priority and modality.
///
/// Video rows stack from the top; all audio rows sit in a second band
/// below the last video row, in the same priority order.
pub fn row_y(priority: u32, track_type: TrackType, layer_count: usize) -> i64 {
    let row = EXPANDED_SIZE + SPACING;
    let base = priority as i64 * row + SPACING;
    match track_type {
        TrackType::Video => base,
        TrackType::Audio => layer_count as i64 * row + base,
    }
}
