//! Show muxer/encoder combinations from a registry snapshot.

use std::path::PathBuf;

use kinocut_media_registry::{
    available_combinations, beautify_factory_name, extension_for_muxer, factory_list,
    CachedEncoderList, ElementDescriptor, ElementRegistry,
};

pub fn run(registry_path: PathBuf, only_muxer: Option<String>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&registry_path).map_err(|e| {
        anyhow::anyhow!("Failed to read registry {}: {e}", registry_path.display())
    })?;
    let descriptors: Vec<ElementDescriptor> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse registry snapshot: {e}"))?;
    let registry = ElementRegistry::from_descriptors(descriptors);

    let mut cache = CachedEncoderList::new();
    let table = available_combinations(&mut cache, &registry);

    if table.containers.is_empty() {
        println!("No displayable containers (need audio and video encoders for each).");
        return Ok(());
    }

    for muxer in &table.containers {
        if let Some(only) = &only_muxer {
            if &muxer.name != only {
                continue;
            }
        }

        let extension = extension_for_muxer(&muxer.name).unwrap_or("?");
        println!(
            "{} ({}, .{})",
            beautify_factory_name(&muxer.long_name),
            muxer.name,
            extension
        );

        if let Some(audio) = table.audio.get(&muxer.name) {
            println!("  Audio:");
            for (pretty, descriptor) in factory_list(audio.iter().copied()) {
                println!("    {} ({})", pretty, descriptor.name);
            }
        }
        if let Some(video) = table.video.get(&muxer.name) {
            println!("  Video:");
            for (pretty, descriptor) in factory_list(video.iter().copied()) {
                println!("    {} ({})", pretty, descriptor.name);
            }
        }
        println!();
    }

    Ok(())
}
