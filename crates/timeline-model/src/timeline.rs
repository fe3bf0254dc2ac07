//! The timeline: priority-ordered layers of clips plus the change queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::clip::{Clip, ClipId, ClipSpec, LayerId, TimestampNs, TrackType};
use crate::event::{ElementField, TimelineEvent};

/// One layer of the edited project. Priority 0 is the topmost row; larger
/// priorities stack below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub priority: u32,
    pub clips: Vec<Clip>,
}

/// The edited project timeline.
///
/// Mutations never touch media; they update the model and push a
/// [`TimelineEvent`] onto the ordered queue. While updates are suspended
/// (batched reorders, splits), events are deferred and flushed on resume
/// so no observer sees a half-applied state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    layers: Vec<Layer>,
    tracks: Vec<TrackType>,

    next_clip: u64,
    next_layer: u64,
    next_group: u64,

    /// Distance (ns) below which the engine snaps drag edges together.
    pub snapping_distance_ns: TimestampNs,

    /// Delivery is on unless explicitly suspended; a fresh or
    /// deserialized timeline must not start with events held back.
    #[serde(skip, default = "updates_on")]
    updates_enabled: bool,
    #[serde(skip)]
    pending: VecDeque<TimelineEvent>,
    #[serde(skip)]
    deferred: Vec<TimelineEvent>,
    #[serde(skip)]
    last_duration: TimestampNs,
}

fn updates_on() -> bool {
    true
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            tracks: Vec::new(),
            next_clip: 0,
            next_layer: 0,
            next_group: 0,
            snapping_distance_ns: 0,
            updates_enabled: true,
            pending: VecDeque::new(),
            deferred: Vec::new(),
            last_duration: 0,
        }
    }

    // ---- Queries -------------------------------------------------------

    /// Layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers sorted by priority ascending.
    pub fn layers_by_priority(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().collect();
        layers.sort_by_key(|l| l.priority);
        layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Priority of the given layer, if present.
    pub fn layer_priority(&self, id: LayerId) -> Option<u32> {
        self.layer(id).map(|l| l.priority)
    }

    /// The layer owning the given clip, plus the clip itself.
    pub fn clip(&self, id: ClipId) -> Option<(&Layer, &Clip)> {
        self.layers.iter().find_map(|layer| {
            layer
                .clips
                .iter()
                .find(|c| c.id == id)
                .map(|clip| (layer, clip))
        })
    }

    /// Track modalities present on the timeline.
    pub fn tracks(&self) -> &[TrackType] {
        &self.tracks
    }

    /// Total duration: the furthest clip end, 0 for an empty timeline.
    pub fn duration_ns(&self) -> TimestampNs {
        self.layers
            .iter()
            .flat_map(|l| l.clips.iter())
            .map(|c| c.end_ns())
            .max()
            .unwrap_or(0)
    }

    // ---- Event queue ---------------------------------------------------

    /// Drain queued events, in mutation order.
    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.pending.drain(..).collect()
    }

    /// Suspend or resume event delivery.
    ///
    /// While suspended, mutations still apply but their events are held
    /// back; resuming flushes them in order with consecutive duplicate
    /// reorder notifications collapsed.
    pub fn enable_updates(&mut self, enabled: bool) {
        if self.updates_enabled == enabled {
            return;
        }
        self.updates_enabled = enabled;
        if enabled {
            let mut last_was_reorder = false;
            for event in self.deferred.drain(..) {
                let is_reorder = matches!(event, TimelineEvent::LayersReordered);
                if is_reorder && last_was_reorder {
                    continue;
                }
                last_was_reorder = is_reorder;
                self.pending.push_back(event);
            }
        }
    }

    fn emit(&mut self, event: TimelineEvent) {
        if self.updates_enabled {
            self.pending.push_back(event);
        } else {
            self.deferred.push(event);
        }
    }

    fn check_duration(&mut self) {
        let duration = self.duration_ns();
        if duration != self.last_duration {
            self.last_duration = duration;
            self.emit(TimelineEvent::DurationChanged {
                duration_ns: duration,
            });
        }
    }

    // ---- Track and layer management -----------------------------------

    pub fn add_track(&mut self, track_type: TrackType) {
        self.tracks.push(track_type);
        self.emit(TimelineEvent::TrackAdded { track_type });
    }

    pub fn remove_track(&mut self, track_type: TrackType) {
        match self.tracks.iter().position(|t| *t == track_type) {
            Some(index) => {
                self.tracks.remove(index);
                self.emit(TimelineEvent::TrackRemoved { track_type });
            }
            None => {
                tracing::warn!(?track_type, "remove_track: no such track");
            }
        }
    }

    /// Append a layer at the lowest priority.
    pub fn add_layer(&mut self) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        let priority = self.layers.len() as u32;
        self.layers.push(Layer {
            id,
            priority,
            clips: Vec::new(),
        });
        self.emit(TimelineEvent::LayerAdded { layer: id });
        id
    }

    /// Remove a layer and renumber those below it.
    pub fn remove_layer(&mut self, id: LayerId) {
        let Some(index) = self.layers.iter().position(|l| l.id == id) else {
            tracing::warn!(layer = id.0, "remove_layer: no such layer");
            return;
        };
        let removed = self.layers.remove(index);
        for layer in &mut self.layers {
            if layer.priority > removed.priority {
                layer.priority -= 1;
            }
        }
        self.emit(TimelineEvent::LayerRemoved { layer: id });
        if !self.layers.is_empty() {
            self.emit(TimelineEvent::LayersReordered);
        }
        self.check_duration();
        debug_assert!(self.priorities_are_consistent());
    }

    /// Move a layer to a target priority, shifting the layers strictly
    /// between the old and new position by one.
    ///
    /// Atomic with respect to observers: a single reorder event is
    /// emitted after all priorities are rewritten. A target outside
    /// `[0, n)` clamps to the nearest bound. Unknown layers are a
    /// diagnostic no-op.
    pub fn move_layer(&mut self, id: LayerId, target: u32) {
        let count = self.layers.len() as u32;
        let Some(priority) = self.layer_priority(id) else {
            tracing::warn!(layer = id.0, "move_layer: no such layer");
            return;
        };
        let target = target.min(count.saturating_sub(1));
        if priority == target {
            return;
        }

        if priority > target {
            // Moving up: everything in [target, priority) shifts down.
            for layer in &mut self.layers {
                if layer.priority >= target && layer.priority < priority {
                    layer.priority += 1;
                }
            }
        } else {
            // Moving down: everything in (priority, target] shifts up.
            for layer in &mut self.layers {
                if layer.priority > priority && layer.priority <= target {
                    layer.priority -= 1;
                }
            }
        }
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.priority = target;
        }

        self.emit(TimelineEvent::LayersReordered);
        debug_assert!(self.priorities_are_consistent());
    }

    fn priorities_are_consistent(&self) -> bool {
        let mut priorities: Vec<u32> = self.layers.iter().map(|l| l.priority).collect();
        priorities.sort_unstable();
        priorities == (0..self.layers.len() as u32).collect::<Vec<_>>()
    }

    // ---- Clip management ----------------------------------------------

    /// Insert a clip on the given layer.
    pub fn add_clip(&mut self, layer_id: LayerId, spec: ClipSpec) -> Option<ClipId> {
        let Some(index) = self.layers.iter().position(|l| l.id == layer_id) else {
            tracing::warn!(layer = layer_id.0, "add_clip: no such layer");
            return None;
        };
        let id = ClipId(self.next_clip);
        self.next_clip += 1;
        let clip = Clip {
            id,
            name: spec.name,
            start_ns: spec.start_ns,
            duration_ns: spec.duration_ns,
            inpoint_ns: spec.inpoint_ns,
            track_type: spec.track_type,
            kind: spec.kind,
            group: None,
        };
        self.layers[index].clips.push(clip);
        self.emit(TimelineEvent::ElementAdded {
            clip: id,
            layer: layer_id,
        });
        self.check_duration();
        Some(id)
    }

    /// Remove a clip. Unknown clips are a diagnostic no-op.
    pub fn remove_clip(&mut self, id: ClipId) {
        let mut found = false;
        for layer in &mut self.layers {
            if let Some(index) = layer.clips.iter().position(|c| c.id == id) {
                layer.clips.remove(index);
                found = true;
                break;
            }
        }
        if !found {
            tracing::warn!(clip = id.0, "remove_clip: no such clip");
            return;
        }
        self.emit(TimelineEvent::ElementRemoved { clip: id });
        self.check_duration();
    }

    pub fn set_clip_start(&mut self, id: ClipId, start_ns: TimestampNs) {
        self.mutate_clip(id, ElementField::Start, |clip| clip.start_ns = start_ns);
    }

    pub fn set_clip_duration(&mut self, id: ClipId, duration_ns: TimestampNs) {
        self.mutate_clip(id, ElementField::Duration, |clip| {
            clip.duration_ns = duration_ns
        });
    }

    pub fn set_clip_inpoint(&mut self, id: ClipId, inpoint_ns: TimestampNs) {
        self.mutate_clip(id, ElementField::InPoint, |clip| {
            clip.inpoint_ns = inpoint_ns
        });
    }

    fn mutate_clip(&mut self, id: ClipId, field: ElementField, apply: impl FnOnce(&mut Clip)) {
        let Some(clip) = self
            .layers
            .iter_mut()
            .flat_map(|l| l.clips.iter_mut())
            .find(|c| c.id == id)
        else {
            tracing::warn!(clip = id.0, ?field, "clip mutation: no such clip");
            return;
        };
        apply(clip);
        self.emit(TimelineEvent::ElementChanged { clip: id, field });
        self.check_duration();
    }

    // ---- Editing commands ---------------------------------------------

    /// Split every clip spanning `position`, regardless of selection.
    ///
    /// Each spanning clip is truncated at the position and a sibling is
    /// inserted covering the remainder, with its in-point advanced by the
    /// length of the first half. Returns the number of clips split.
    pub fn split_at(&mut self, position: TimestampNs) -> usize {
        let spanning: Vec<(LayerId, ClipId)> = self
            .layers
            .iter()
            .flat_map(|layer| {
                layer
                    .clips
                    .iter()
                    .filter(|c| c.spans(position))
                    .map(move |c| (layer.id, c.id))
            })
            .collect();

        let was_enabled = self.updates_enabled;
        self.enable_updates(false);
        for &(layer_id, clip_id) in &spanning {
            let Some((_, clip)) = self.clip(clip_id) else {
                continue;
            };
            let head_len = position - clip.start_ns;
            let spec = ClipSpec {
                name: clip.name.clone(),
                start_ns: position,
                duration_ns: clip.end_ns() - position,
                inpoint_ns: clip.inpoint_ns + head_len,
                track_type: clip.track_type,
                kind: clip.kind,
            };
            self.set_clip_duration(clip_id, head_len);
            self.add_clip(layer_id, spec);
        }
        self.enable_updates(was_enabled);
        spanning.len()
    }

    /// Remove the given clips in one batch.
    pub fn delete_clips(&mut self, ids: &[ClipId]) {
        let was_enabled = self.updates_enabled;
        self.enable_updates(false);
        for &id in ids {
            self.remove_clip(id);
        }
        self.enable_updates(was_enabled);
    }

    /// Put the given clips into a fresh group. Returns the group id, or
    /// `None` when no listed clip exists.
    pub fn group_clips(&mut self, ids: &[ClipId]) -> Option<u64> {
        let group = self.next_group;
        let mut grouped = 0;
        for layer in &mut self.layers {
            for clip in &mut layer.clips {
                if ids.contains(&clip.id) {
                    clip.group = Some(group);
                    grouped += 1;
                }
            }
        }
        if grouped == 0 {
            tracing::warn!("group_clips: none of the clips exist");
            return None;
        }
        self.next_group += 1;
        Some(group)
    }

    /// Dissolve group membership of the given clips.
    pub fn ungroup_clips(&mut self, ids: &[ClipId]) {
        for layer in &mut self.layers {
            for clip in &mut layer.clips {
                if ids.contains(&clip.id) {
                    clip.group = None;
                }
            }
        }
    }

    // ---- Snapping ------------------------------------------------------

    /// Forwarded from the engine while a drag is in snapping range.
    pub fn notify_snapping_started(&mut self, position_ns: TimestampNs) {
        self.emit(TimelineEvent::SnappingStarted { position_ns });
    }

    /// Forwarded from the engine when a drag leaves snapping range.
    pub fn notify_snapping_ended(&mut self) {
        self.emit(TimelineEvent::SnappingEnded);
    }
}
