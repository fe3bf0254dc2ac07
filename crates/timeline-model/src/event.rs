//! Typed change events emitted by the timeline model.
//!
//! Events replace toolkit signal wiring: every mutation pushes onto an
//! ordered queue which an external dispatcher drains and feeds to the
//! viewport engine one at a time. Each event must be handled to
//! completion before the next is delivered.

use serde::{Deserialize, Serialize};

use crate::clip::{ClipId, LayerId, TimestampNs, TrackType};

/// Which mutable element property changed.
///
/// Vertical position is not a per-clip property; it follows the owning
/// layer and is re-derived on [`TimelineEvent::LayersReordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementField {
    Start,
    Duration,
    InPoint,
}

/// A single model change, delivered in mutation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// A track of the given modality was added to the timeline.
    TrackAdded { track_type: TrackType },

    /// A track was removed.
    TrackRemoved { track_type: TrackType },

    /// A layer was appended.
    LayerAdded { layer: LayerId },

    /// A layer was removed; its clips are gone with it.
    LayerRemoved { layer: LayerId },

    /// Layer priorities were rewritten atomically (drag reorder).
    LayersReordered,

    /// A clip appeared on the given layer.
    ElementAdded { clip: ClipId, layer: LayerId },

    /// A clip was removed.
    ElementRemoved { clip: ClipId },

    /// One property of a clip changed.
    ElementChanged { clip: ClipId, field: ElementField },

    /// The total timeline duration changed.
    DurationChanged { duration_ns: TimestampNs },

    /// The engine proposed a snap point while dragging.
    ///
    /// A position of exactly zero is indistinguishable from "snapping
    /// ended"; consumers treat it as such (known limitation).
    SnappingStarted { position_ns: TimestampNs },

    /// The drag moved out of snapping range.
    SnappingEnded,
}
