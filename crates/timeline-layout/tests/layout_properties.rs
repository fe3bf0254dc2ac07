//! Property tests for zoom arithmetic and viewport reflow.

use proptest::prelude::*;

use kinocut_timeline_layout::{
    pixels_per_second, ViewportEngine, ZoomState, ZOOM_LEVELS,
};
use kinocut_timeline_model::{ClipKind, ClipSpec, Timeline, TrackType};

proptest! {
    /// Higher levels always mean more pixels per second.
    #[test]
    fn zoom_ratio_is_monotonic(a in 0u32..ZOOM_LEVELS, b in 0u32..ZOOM_LEVELS) {
        if a < b {
            prop_assert!(pixels_per_second(a) < pixels_per_second(b));
        }
    }

    /// Converting a position to a pixel and back loses at most the time
    /// span of a single pixel.
    #[test]
    fn pixel_round_trip_error_is_sub_pixel(
        level in 0u32..ZOOM_LEVELS,
        position in 0u64..3_600_000_000_000u64,
    ) {
        let mut zoom = ZoomState::new();
        zoom.set_level(level);
        let back = zoom.to_ns(zoom.to_pixel(position));
        let one_pixel_ns = zoom.to_ns(1).max(1);
        prop_assert!(back.abs_diff(position) <= one_pixel_ns);
    }

    /// A zoom change reflows every proxied element exactly once.
    #[test]
    fn zoom_reflow_touches_each_element_once(
        clips in 1usize..20,
        level in 0u32..ZOOM_LEVELS,
    ) {
        let mut timeline = Timeline::new();
        let layer = timeline.add_layer();
        for i in 0..clips {
            timeline.add_clip(layer, ClipSpec {
                name: format!("clip{i}"),
                start_ns: i as u64 * 1_000_000,
                duration_ns: 500_000,
                inpoint_ns: 0,
                track_type: TrackType::Video,
                kind: ClipKind::Source,
            });
        }

        let mut zoom = ZoomState::new();
        let mut engine = ViewportEngine::new();
        engine.bind(&timeline, &zoom);

        zoom.set_level(level);
        prop_assert_eq!(engine.on_zoom_changed(&zoom, &timeline), clips);

        // Geometry agrees with direct conversion afterwards.
        for (_, element) in engine.elements() {
            prop_assert_eq!(element.width, zoom.to_pixel(500_000));
        }
    }

    /// A snap notification at position zero reads as "no snap", the same
    /// observable state as an explicit snap-ended notification.
    #[test]
    fn snap_at_zero_equals_snap_ended(position in 0u64..1_000_000_000u64) {
        let zoom = ZoomState::new();
        let mut timeline = Timeline::new();
        timeline.add_layer();
        timeline.drain_events();

        let mut engine = ViewportEngine::new();
        engine.bind(&timeline, &zoom);

        timeline.notify_snapping_started(position);
        for event in timeline.drain_events() {
            engine.handle_event(&timeline, &event, &zoom);
        }

        if position == 0 {
            prop_assert!(engine.snap_position_ns().is_none());
        } else {
            prop_assert_eq!(engine.snap_position_ns(), Some(position));
        }

        timeline.notify_snapping_ended();
        for event in timeline.drain_events() {
            engine.handle_event(&timeline, &event, &zoom);
        }
        prop_assert!(engine.snap_position_ns().is_none());
    }
}
