//! Compute screen geometry for a timeline file.

use std::path::PathBuf;

use kinocut_timeline_layout::{ScrollRegion, ViewportEngine, ZoomState, CONTROL_WIDTH};
use kinocut_timeline_model::Timeline;

pub fn run(
    timeline_path: PathBuf,
    zoom_level: Option<u32>,
    width: u32,
    playhead_ns: u64,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&timeline_path).map_err(|e| {
        anyhow::anyhow!("Failed to read timeline {}: {e}", timeline_path.display())
    })?;
    let timeline: Timeline = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse timeline: {e}"))?;

    let canvas_width = width.saturating_sub(CONTROL_WIDTH as u32).max(1) as f64;
    let mut zoom = ZoomState::new();
    match zoom_level {
        Some(level) => zoom.set_level(level),
        None => zoom.zoom_fit(timeline.duration_ns(), canvas_width),
    }

    let mut engine = ViewportEngine::new();
    engine.bind(&timeline, &zoom);
    engine.set_playhead(playhead_ns);

    let mut scroll = ScrollRegion::new(canvas_width);
    scroll.update(&timeline, &zoom);
    scroll.scroll_to_playhead(playhead_ns, &zoom);

    println!(
        "Zoom level {} ({:.3} px/s){}",
        zoom.level(),
        zoom.ratio(),
        if zoom.zoomed_fitted() { ", fitted" } else { "" }
    );
    println!(
        "Duration: {:.3}s, canvas {:.0}px, scroll upper {:.0}px, view at {:.0}px",
        timeline.duration_ns() as f64 / 1e9,
        canvas_width,
        scroll.upper,
        scroll.value
    );
    println!("Playhead: x={}px", engine.playhead_x(&zoom));
    println!();

    for layer in timeline.layers_by_priority() {
        println!("Layer {} (priority {}):", layer.id.0, layer.priority);
        for clip in &layer.clips {
            let Some(element) = engine.element(clip.id) else {
                continue;
            };
            println!(
                "  {:24} x={:6} y={:4} w={:6} h={:3} z={} [{:?}]",
                clip.name, element.x, element.y, element.width, element.height, element.z,
                clip.track_type
            );
        }
    }

    Ok(())
}
