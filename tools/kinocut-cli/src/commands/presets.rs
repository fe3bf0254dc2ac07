//! List saved render presets.

use kinocut_common::config::AppConfig;
use kinocut_render_session::{PresetManager, NO_PRESET};

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let manager = PresetManager::load(&config.presets_dir)
        .map_err(|e| anyhow::anyhow!("Failed to load presets: {e}"))?;

    println!("Presets in {}:", config.presets_dir.display());
    for name in manager.display_entries() {
        if name == NO_PRESET {
            continue;
        }
        let Some(preset) = manager.preset(&name) else {
            continue;
        };
        let settings = &preset.settings;
        println!(
            "  {:20} {} + {} / {} ({}x{} @ {}/{})",
            name,
            settings.muxer,
            settings.video_encoder,
            settings.audio_encoder,
            settings.width,
            settings.height,
            settings.framerate.num,
            settings.framerate.den
        );
    }
    if manager.presets().is_empty() {
        println!("  (none)");
    }

    Ok(())
}
