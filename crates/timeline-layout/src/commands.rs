//! Editing actions driven by the toolbar and shortcuts.

use kinocut_timeline_model::{ClipId, Timeline, TimestampNs};

use crate::selection::Selection;
use crate::zoom::ZoomState;

/// A user-level editing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingCommand {
    /// Split every clip under the playhead, selected or not.
    SplitAtPlayhead,
    /// Delete the selected clips.
    DeleteSelected,
    /// Group the selected clips.
    GroupSelected,
    /// Ungroup the selected clips.
    UngroupSelected,
    /// Align the selected clips; the actual alignment analysis runs in
    /// the external engine, this only validates the selection.
    AlignSelected,
}

/// Apply a command to the model, updating the selection as needed.
pub fn apply_command(
    command: EditingCommand,
    timeline: &mut Timeline,
    selection: &mut Selection,
    playhead_ns: TimestampNs,
) {
    match command {
        EditingCommand::SplitAtPlayhead => {
            let split = timeline.split_at(playhead_ns);
            tracing::debug!(split, position = playhead_ns, "split at playhead");
        }
        EditingCommand::DeleteSelected => {
            if !selection.can_delete() {
                return;
            }
            let ids: Vec<ClipId> = selection.clips().collect();
            timeline.delete_clips(&ids);
            selection.clear();
        }
        EditingCommand::GroupSelected => {
            if !selection.can_group() {
                return;
            }
            let ids: Vec<ClipId> = selection.clips().collect();
            timeline.group_clips(&ids);
        }
        EditingCommand::UngroupSelected => {
            if !selection.can_ungroup(timeline) {
                return;
            }
            let ids: Vec<ClipId> = selection.clips().collect();
            timeline.ungroup_clips(&ids);
        }
        EditingCommand::AlignSelected => {
            if selection.len() < 2 {
                return;
            }
            let clips = selection.len();
            tracing::debug!(clips, "alignment delegated to the external engine");
        }
    }
}

/// Keep the model's snap distance equal to a fixed on-screen deadband.
///
/// Called after every zoom change so edge snapping covers the same
/// number of pixels at any magnification.
pub fn refresh_snapping_distance(timeline: &mut Timeline, zoom: &ZoomState, deadband_px: u32) {
    timeline.snapping_distance_ns = zoom.to_ns(deadband_px as i64);
}
