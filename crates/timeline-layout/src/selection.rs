//! Clip selection and the action sensitivity derived from it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use kinocut_timeline_model::{ClipId, Timeline};

/// How a new set of clips combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Replace the selection.
    Select,
    /// Extend the selection.
    Add,
    /// Remove from the selection.
    Unselect,
}

/// The set of selected clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    clips: BTreeSet<ClipId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clips(&self) -> impl Iterator<Item = ClipId> + '_ {
        self.clips.iter().copied()
    }

    pub fn contains(&self, clip: ClipId) -> bool {
        self.clips.contains(&clip)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Apply a selection gesture. Returns whether the selection actually
    /// changed; callers refresh action sensitivity only on `true`.
    pub fn set_selection(&mut self, clips: &[ClipId], mode: SelectionMode) -> bool {
        let before = self.clips.clone();
        match mode {
            SelectionMode::Select => {
                self.clips = clips.iter().copied().collect();
            }
            SelectionMode::Add => {
                self.clips.extend(clips.iter().copied());
            }
            SelectionMode::Unselect => {
                for clip in clips {
                    self.clips.remove(clip);
                }
            }
        }
        self.clips != before
    }

    pub fn clear(&mut self) -> bool {
        self.set_selection(&[], SelectionMode::Select)
    }

    /// Drop selected clips that no longer exist in the model.
    pub fn prune(&mut self, timeline: &Timeline) {
        self.clips.retain(|id| timeline.clip(*id).is_some());
    }

    /// Grouping needs at least two clips.
    pub fn can_group(&self) -> bool {
        self.clips.len() > 1
    }

    /// Ungrouping needs a selected clip that belongs to a group.
    pub fn can_ungroup(&self, timeline: &Timeline) -> bool {
        self.clips
            .iter()
            .filter_map(|id| timeline.clip(*id))
            .any(|(_, clip)| clip.group.is_some())
    }

    pub fn can_delete(&self) -> bool {
        !self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinocut_timeline_model::{ClipKind, ClipSpec, TrackType};

    fn timeline_with_clips(n: u64) -> (Timeline, Vec<ClipId>) {
        let mut timeline = Timeline::new();
        let layer = timeline.add_layer();
        let ids = (0..n)
            .map(|i| {
                timeline
                    .add_clip(
                        layer,
                        ClipSpec {
                            name: format!("clip{i}"),
                            start_ns: i * 100,
                            duration_ns: 100,
                            inpoint_ns: 0,
                            track_type: TrackType::Video,
                            kind: ClipKind::Source,
                        },
                    )
                    .unwrap()
            })
            .collect();
        (timeline, ids)
    }

    #[test]
    fn modes_replace_extend_and_remove() {
        let (_timeline, ids) = timeline_with_clips(3);
        let mut selection = Selection::new();

        assert!(selection.set_selection(&[ids[0]], SelectionMode::Select));
        assert!(selection.set_selection(&[ids[1]], SelectionMode::Add));
        assert_eq!(selection.len(), 2);

        assert!(selection.set_selection(&[ids[0]], SelectionMode::Unselect));
        assert!(!selection.contains(ids[0]));
        assert!(selection.contains(ids[1]));

        assert!(selection.set_selection(&[ids[2]], SelectionMode::Select));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn unchanged_gesture_reports_false() {
        let (_timeline, ids) = timeline_with_clips(1);
        let mut selection = Selection::new();
        selection.set_selection(&[ids[0]], SelectionMode::Select);
        assert!(!selection.set_selection(&[ids[0]], SelectionMode::Select));
        assert!(!selection.set_selection(&[ids[0]], SelectionMode::Add));
    }

    #[test]
    fn sensitivity_follows_selection() {
        let (mut timeline, ids) = timeline_with_clips(2);
        let mut selection = Selection::new();
        assert!(!selection.can_delete());
        assert!(!selection.can_group());

        selection.set_selection(&ids, SelectionMode::Select);
        assert!(selection.can_delete());
        assert!(selection.can_group());
        assert!(!selection.can_ungroup(&timeline));

        timeline.group_clips(&ids);
        assert!(selection.can_ungroup(&timeline));
    }

    #[test]
    fn prune_drops_vanished_clips() {
        let (mut timeline, ids) = timeline_with_clips(2);
        let mut selection = Selection::new();
        selection.set_selection(&ids, SelectionMode::Select);
        timeline.remove_clip(ids[0]);
        selection.prune(&timeline);
        assert!(!selection.contains(ids[0]));
        assert!(selection.contains(ids[1]));
    }
}
