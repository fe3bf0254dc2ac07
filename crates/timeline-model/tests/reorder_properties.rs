//! Property tests for layer reordering.

use proptest::prelude::*;

use kinocut_timeline_model::{LayerId, Timeline, TimelineEvent};

fn build_timeline(layers: usize) -> (Timeline, Vec<LayerId>) {
    let mut timeline = Timeline::new();
    let ids: Vec<LayerId> = (0..layers).map(|_| timeline.add_layer()).collect();
    timeline.drain_events();
    (timeline, ids)
}

proptest! {
    /// After any sequence of moves, priorities are a permutation of
    /// `0..n` and relative order of unmoved layers is preserved per step.
    #[test]
    fn priorities_stay_a_permutation(
        layers in 2usize..8,
        moves in prop::collection::vec((0usize..8, 0u32..8), 0..20),
    ) {
        let (mut timeline, ids) = build_timeline(layers);
        for (index, target) in moves {
            timeline.move_layer(ids[index % layers], target);

            let mut priorities: Vec<u32> = timeline
                .layers()
                .iter()
                .map(|l| l.priority)
                .collect();
            priorities.sort_unstable();
            let expected: Vec<u32> = (0..layers as u32).collect();
            prop_assert_eq!(priorities, expected);
        }
    }

    /// Every effective move emits exactly one reorder event, never a
    /// cascade of per-layer changes.
    #[test]
    fn each_move_emits_one_reorder_event(
        layers in 2usize..8,
        index in 0usize..8,
        target in 0u32..8,
    ) {
        let (mut timeline, ids) = build_timeline(layers);
        let id = ids[index % layers];
        let before = timeline.layer_priority(id);

        timeline.move_layer(id, target);
        let events = timeline.drain_events();

        let effective_target = target.min(layers as u32 - 1);
        if before == Some(effective_target) {
            prop_assert!(events.is_empty());
        } else {
            prop_assert_eq!(events, vec![TimelineEvent::LayersReordered]);
        }
    }

    /// A move followed by the inverse move restores the original layout.
    #[test]
    fn moves_are_invertible(
        layers in 2usize..8,
        index in 0usize..8,
        target in 0u32..8,
    ) {
        let (mut timeline, ids) = build_timeline(layers);
        let id = ids[index % layers];
        let original: Vec<(LayerId, u32)> = timeline
            .layers()
            .iter()
            .map(|l| (l.id, l.priority))
            .collect();
        let before = timeline.layer_priority(id).unwrap();

        timeline.move_layer(id, target);
        timeline.move_layer(id, before);

        let restored: Vec<(LayerId, u32)> = timeline
            .layers()
            .iter()
            .map(|l| (l.id, l.priority))
            .collect();
        prop_assert_eq!(restored, original);
    }
}
