//! Encoder/muxer compatibility resolution.
//!
//! An encoder feeds a container when at least one of its src caps has a
//! non-empty intersection with at least one of the muxer's sink pad
//! template caps. Results keep registry iteration order; sorting is a
//! display concern handled by [`crate::naming::factory_list`].

use std::collections::BTreeMap;

use crate::caps::MediaCaps;
use crate::descriptor::{ElementDescriptor, PadDirection};
use crate::registry::{CachedEncoderList, ElementRegistry};

/// Name of the first sink pad template of `factory_name` compatible with
/// `caps`, or `None` when the factory is unknown or nothing matches.
///
/// An unknown factory name is a diagnostic, not an error: callers treat
/// it as "no compatible pad".
pub fn compatible_sink_pad<'a>(
    registry: &'a ElementRegistry,
    factory_name: &str,
    caps: &MediaCaps,
) -> Option<&'a str> {
    let Some(factory) = registry.lookup(factory_name) else {
        tracing::warn!(factory = factory_name, "not a valid factory name");
        return None;
    };
    factory
        .pad_templates
        .iter()
        .find(|t| t.direction == PadDirection::Sink && t.caps.can_intersect(caps))
        .map(|t| t.name_template.as_str())
}

/// Intersection between `caps` and the first compatible sink pad template
/// of `factory_name`, or `None` when the factory is unknown or nothing
/// intersects.
pub fn compatible_sink_caps(
    registry: &ElementRegistry,
    factory_name: &str,
    caps: &MediaCaps,
) -> Option<MediaCaps> {
    let Some(factory) = registry.lookup(factory_name) else {
        tracing::warn!(factory = factory_name, "not a valid factory name");
        return None;
    };
    factory
        .sink_caps()
        .into_iter()
        .map(|sink| sink.intersect(caps))
        .find(|inter| !inter.is_empty())
}

/// Whether `caps` intersect some of the muxer's sink pad template caps.
///
/// `sink_cache` skips re-collecting the muxer's sink caps when the caller
/// checks many encoders against one muxer.
pub fn can_sink_caps(
    muxer: &ElementDescriptor,
    caps: &MediaCaps,
    sink_cache: Option<&[MediaCaps]>,
) -> bool {
    match sink_cache {
        Some(sinks) => sinks.iter().any(|sink| sink.can_intersect(caps)),
        None => muxer.sink_caps().iter().any(|sink| sink.can_intersect(caps)),
    }
}

/// Whether the muxer accepts raw (unencoded) audio.
pub fn muxer_can_sink_raw_audio(muxer: &ElementDescriptor) -> bool {
    can_sink_caps(muxer, &MediaCaps::simple("audio/x-raw"), None)
}

/// Whether the muxer accepts raw (unencoded) video.
pub fn muxer_can_sink_raw_video(muxer: &ElementDescriptor) -> bool {
    can_sink_caps(muxer, &MediaCaps::simple("video/x-raw"), None)
}

/// The encoders compatible with the given muxer, in input order.
pub fn compatible_encoders<'a>(
    encoders: &[&'a ElementDescriptor],
    muxer: &ElementDescriptor,
) -> Vec<&'a ElementDescriptor> {
    let sink_cache: Vec<MediaCaps> = muxer.sink_caps().into_iter().cloned().collect();
    encoders
        .iter()
        .filter(|encoder| {
            encoder
                .src_caps()
                .iter()
                .any(|src| can_sink_caps(muxer, src, Some(&sink_cache)))
        })
        .copied()
        .collect()
}

/// Displayable containers with their compatible encoders.
///
/// Containers lacking either a compatible audio or a compatible video
/// encoder are hidden entirely, even when an audio-only or video-only
/// render is intended.
#[derive(Debug)]
pub struct CombinationTable<'a> {
    /// Muxers with at least one compatible encoder of each modality.
    pub containers: Vec<&'a ElementDescriptor>,

    /// Muxer name → compatible audio encoders.
    pub audio: BTreeMap<String, Vec<&'a ElementDescriptor>>,

    /// Muxer name → compatible video encoders.
    pub video: BTreeMap<String, Vec<&'a ElementDescriptor>>,
}

/// Resolve every displayable muxer/encoder combination.
pub fn available_combinations<'a>(
    cache: &mut CachedEncoderList,
    registry: &'a ElementRegistry,
) -> CombinationTable<'a> {
    let audio_encoders = cache.audio_encoders(registry);
    let video_encoders = cache.video_encoders(registry);
    let muxers = cache.muxers(registry);

    let mut containers = Vec::new();
    let mut audio = BTreeMap::new();
    let mut video = BTreeMap::new();

    for muxer in muxers {
        let aencs = compatible_encoders(&audio_encoders, muxer);
        let vencs = compatible_encoders(&video_encoders, muxer);
        if !aencs.is_empty() && !vencs.is_empty() {
            audio.insert(muxer.name.clone(), aencs);
            video.insert(muxer.name.clone(), vencs);
            containers.push(muxer);
        }
    }

    CombinationTable {
        containers,
        audio,
        video,
    }
}
