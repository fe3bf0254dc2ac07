//! Encoding profiles derived from render settings.
//!
//! A profile is the declarative description the export pipeline is built
//! from: a container format plus one stream profile per enabled
//! modality. Stream formats are derived from the encoder's `src` pad
//! template with every unfixed field dropped, so the pipeline gets a
//! concrete format instead of a range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kinocut_common::error::{KinocutError, KinocutResult};
use kinocut_media_registry::{
    CapsStructure, CapsValue, ElementDescriptor, ElementRegistry, MediaCaps,
};

use crate::settings::RenderSettings;

/// One encoded stream inside the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamProfile {
    /// Encoder factory name.
    pub encoder: String,

    /// Fixed output format of the encoder.
    pub format: MediaCaps,

    /// Raw-input constraints (frame size, rate) fed to the encoder.
    pub restriction: MediaCaps,

    /// Extra encoder element properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// The complete encoding profile for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerProfile {
    /// Muxer factory name.
    pub muxer: String,

    /// Fixed container format.
    pub format: MediaCaps,

    /// Extra muxer element properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    pub audio: Option<StreamProfile>,
    pub video: Option<StreamProfile>,
}

/// Build the encoding profile for the given settings.
///
/// Fails when no output stream is enabled or a named factory is missing
/// from the registry.
pub fn build_container_profile(
    registry: &ElementRegistry,
    settings: &RenderSettings,
) -> KinocutResult<ContainerProfile> {
    if !settings.render_allowed() {
        return Err(KinocutError::render("no output stream is enabled"));
    }

    let muxer = registry
        .lookup(&settings.muxer)
        .ok_or_else(|| KinocutError::render(format!("unknown muxer {}", settings.muxer)))?;

    let audio = if settings.audio_enabled {
        let encoder = lookup_encoder(registry, &settings.audio_encoder)?;
        Some(StreamProfile {
            encoder: encoder.name.clone(),
            format: encoder_format(encoder)?,
            restriction: audio_restriction(settings),
            properties: settings.audio_codec_settings.clone(),
        })
    } else {
        None
    };

    let video = if settings.video_enabled {
        let encoder = lookup_encoder(registry, &settings.video_encoder)?;
        Some(StreamProfile {
            encoder: encoder.name.clone(),
            format: encoder_format(encoder)?,
            restriction: video_restriction(settings),
            properties: settings.video_codec_settings.clone(),
        })
    } else {
        None
    };

    let profile = ContainerProfile {
        muxer: muxer.name.clone(),
        format: muxer_format(muxer)?,
        properties: settings.container_settings.clone(),
        audio,
        video,
    };
    tracing::debug!(
        muxer = %profile.muxer,
        audio = profile.audio.as_ref().map(|s| s.encoder.as_str()),
        video = profile.video.as_ref().map(|s| s.encoder.as_str()),
        "built container profile"
    );
    Ok(profile)
}

fn lookup_encoder<'a>(
    registry: &'a ElementRegistry,
    name: &str,
) -> KinocutResult<&'a ElementDescriptor> {
    registry
        .lookup(name)
        .ok_or_else(|| KinocutError::render(format!("unknown encoder {name}")))
}

/// Fixed format from the encoder's `src` template, falling back to its
/// first src pad when no template is literally named `src`.
fn encoder_format(encoder: &ElementDescriptor) -> KinocutResult<MediaCaps> {
    let caps = encoder
        .src_template_caps()
        .or_else(|| encoder.src_caps().into_iter().next())
        .ok_or_else(|| {
            KinocutError::render(format!("encoder {} has no src pad template", encoder.name))
        })?;
    Ok(caps.fixed_copy())
}

fn muxer_format(muxer: &ElementDescriptor) -> KinocutResult<MediaCaps> {
    let caps = muxer
        .src_template_caps()
        .or_else(|| muxer.src_caps().into_iter().next())
        .ok_or_else(|| {
            KinocutError::render(format!("muxer {} has no src pad template", muxer.name))
        })?;
    Ok(caps.fixed_copy())
}

fn audio_restriction(settings: &RenderSettings) -> MediaCaps {
    MediaCaps::from_structures(vec![CapsStructure::new("audio/x-raw")
        .with_field("channels", CapsValue::Int(settings.channels as i64))
        .with_field("rate", CapsValue::Int(settings.sample_rate as i64))])
}

fn video_restriction(settings: &RenderSettings) -> MediaCaps {
    let (width, height) = settings.video_output_size(true);
    MediaCaps::from_structures(vec![CapsStructure::new("video/x-raw")
        .with_field("width", CapsValue::Int(width as i64))
        .with_field("height", CapsValue::Int(height as i64))
        .with_field(
            "framerate",
            CapsValue::Fraction {
                num: settings.framerate.num,
                den: settings.framerate.den,
            },
        )])
}
