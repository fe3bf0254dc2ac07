//! Clip and track-element types.

use serde::{Deserialize, Serialize};

/// Timeline position or duration in nanoseconds.
pub type TimestampNs = u64;

/// Unique identifier of a clip within one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub u64);

/// Unique identifier of a layer within one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// The track modality a clip renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Video,
}

/// Whether a clip is regular source material or an auto-generated
/// transition. Transitions draw behind regular clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    #[default]
    Source,
    Transition,
}

/// A media item on the timeline.
///
/// Priority is inherited from the owning layer and not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,

    /// Display name, usually derived from the source asset.
    pub name: String,

    /// Position on the timeline.
    pub start_ns: TimestampNs,

    /// Length on the timeline.
    pub duration_ns: TimestampNs,

    /// Offset into the source material.
    pub inpoint_ns: TimestampNs,

    /// Audio or video.
    pub track_type: TrackType,

    /// Source clip or transition.
    #[serde(default)]
    pub kind: ClipKind,

    /// Group membership; grouped clips move and delete together.
    #[serde(default)]
    pub group: Option<u64>,
}

impl Clip {
    /// End position on the timeline.
    pub fn end_ns(&self) -> TimestampNs {
        self.start_ns + self.duration_ns
    }

    /// Whether `position` falls strictly inside this clip.
    pub fn spans(&self, position: TimestampNs) -> bool {
        self.start_ns < position && position < self.end_ns()
    }
}

/// Parameters for inserting a new clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSpec {
    pub name: String,
    pub start_ns: TimestampNs,
    pub duration_ns: TimestampNs,
    pub inpoint_ns: TimestampNs,
    pub track_type: TrackType,
    #[serde(default)]
    pub kind: ClipKind,
}
