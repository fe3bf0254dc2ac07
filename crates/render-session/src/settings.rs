//! Pure render configuration, decoupled from any dialog widgets.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use kinocut_common::config::RenderDefaults;
use kinocut_media_registry::{
    compatible_encoders, extension_for_muxer, ElementKind, ElementRegistry,
};

/// A frame rate as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framerate {
    pub num: i32,
    pub den: i32,
}

impl Framerate {
    pub const DEFAULT: Framerate = Framerate { num: 30, den: 1 };

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for Framerate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the export pipeline needs to know, as plain data.
///
/// Element property maps are kept per factory so switching encoders and
/// back does not lose tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Muxer factory name.
    pub muxer: String,
    /// Audio encoder factory name.
    pub audio_encoder: String,
    /// Video encoder factory name.
    pub video_encoder: String,

    /// Extra properties for the muxer element.
    #[serde(default)]
    pub container_settings: BTreeMap<String, String>,
    /// Extra properties for the audio encoder.
    #[serde(default)]
    pub audio_codec_settings: BTreeMap<String, String>,
    /// Extra properties for the video encoder.
    #[serde(default)]
    pub video_codec_settings: BTreeMap<String, String>,

    /// Project frame size in pixels.
    pub width: u32,
    pub height: u32,
    /// Render scale as a percentage of the project size.
    pub render_scale: u32,
    pub framerate: Framerate,

    pub channels: u32,
    pub sample_rate: u32,
    pub sample_depth: u32,

    /// Output toggles; rendering needs at least one enabled.
    pub audio_enabled: bool,
    pub video_enabled: bool,

    /// Target file, once chosen.
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_defaults(&RenderDefaults::default())
    }
}

impl RenderSettings {
    /// Seed settings from the application configuration.
    pub fn from_defaults(defaults: &RenderDefaults) -> Self {
        Self {
            muxer: defaults.muxer.clone(),
            audio_encoder: defaults.audio_encoder.clone(),
            video_encoder: defaults.video_encoder.clone(),
            container_settings: BTreeMap::new(),
            audio_codec_settings: BTreeMap::new(),
            video_codec_settings: BTreeMap::new(),
            width: 1920,
            height: 1080,
            render_scale: 100,
            framerate: Framerate::DEFAULT,
            channels: 2,
            sample_rate: 44_100,
            sample_depth: 16,
            audio_enabled: true,
            video_enabled: true,
            output_file: None,
        }
    }

    /// Output frame size. With `render` the project size is scaled by
    /// the render-scale percentage; without it the project size is
    /// returned as-is (preview).
    pub fn video_output_size(&self, render: bool) -> (u32, u32) {
        if render {
            (
                self.width * self.render_scale / 100,
                self.height * self.render_scale / 100,
            )
        } else {
            (self.width, self.height)
        }
    }

    /// Rendering needs at least one enabled modality with an encoder.
    pub fn render_allowed(&self) -> bool {
        let audio_ok = self.audio_enabled && !self.audio_encoder.is_empty();
        let video_ok = self.video_enabled && !self.video_encoder.is_empty();
        audio_ok || video_ok
    }

    /// Swap the extension of a file name to match the current muxer.
    /// Unknown muxers keep the stem bare.
    pub fn filename_for(&self, stem: &str) -> String {
        match extension_for_muxer(&self.muxer) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        }
    }

    /// Switch the muxer and reselect both encoders against it.
    ///
    /// The preferred names are the user's remembered choices; each is
    /// kept when still compatible with the new muxer, otherwise the
    /// first compatible encoder in registry order wins. Returns false
    /// when the muxer is unknown.
    pub fn set_muxer(
        &mut self,
        registry: &ElementRegistry,
        muxer: &str,
        preferred_audio: Option<&str>,
        preferred_video: Option<&str>,
    ) -> bool {
        if registry.lookup(muxer).is_none() {
            tracing::warn!(muxer, "set_muxer: unknown factory");
            return false;
        }
        self.muxer = muxer.to_string();

        let preferred_audio = preferred_audio
            .map(str::to_string)
            .unwrap_or_else(|| self.audio_encoder.clone());
        if let Some(choice) = reselect_encoder(
            registry,
            muxer,
            ElementKind::AudioEncoder,
            Some(&preferred_audio),
        ) {
            self.audio_encoder = choice;
        }

        let preferred_video = preferred_video
            .map(str::to_string)
            .unwrap_or_else(|| self.video_encoder.clone());
        if let Some(choice) = reselect_encoder(
            registry,
            muxer,
            ElementKind::VideoEncoder,
            Some(&preferred_video),
        ) {
            self.video_encoder = choice;
        }
        true
    }
}

/// Pick an encoder of the given kind compatible with `muxer`: the
/// preferred name when it still fits, else the first compatible one.
pub fn reselect_encoder(
    registry: &ElementRegistry,
    muxer: &str,
    kind: ElementKind,
    preferred: Option<&str>,
) -> Option<String> {
    let muxer = registry.lookup(muxer)?;
    let candidates: Vec<_> = registry
        .descriptors()
        .iter()
        .filter(|d| match ElementKind::classify(d) {
            Some(k) if kind == ElementKind::VideoEncoder => k.is_video_encoder(),
            Some(k) => k == kind,
            None => false,
        })
        .collect();
    let compatible = compatible_encoders(&candidates, muxer);
    if let Some(preferred) = preferred {
        if compatible.iter().any(|d| d.name == preferred) {
            return Some(preferred.to_string());
        }
    }
    compatible.first().map(|d| d.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinocut_media_registry::{ElementDescriptor, PadDirection, PadTemplate};

    #[test]
    fn render_size_applies_scale_only_when_rendering() {
        let mut settings = RenderSettings::default();
        settings.width = 1920;
        settings.height = 1080;
        settings.render_scale = 50;
        assert_eq!(settings.video_output_size(false), (1920, 1080));
        assert_eq!(settings.video_output_size(true), (960, 540));
    }

    #[test]
    fn render_allowed_needs_an_enabled_modality() {
        let mut settings = RenderSettings::default();
        assert!(settings.render_allowed());
        settings.audio_enabled = false;
        settings.video_enabled = false;
        assert!(!settings.render_allowed());
        settings.video_enabled = true;
        assert!(settings.render_allowed());
        settings.video_encoder.clear();
        assert!(!settings.render_allowed());
    }

    fn element(name: &str, klass: &str, sink: &[&str], src: &[&str]) -> ElementDescriptor {
        let mut pad_templates = Vec::new();
        for caps in sink {
            pad_templates.push(PadTemplate {
                name_template: "sink".to_string(),
                direction: PadDirection::Sink,
                caps: caps.parse().unwrap(),
            });
        }
        for caps in src {
            pad_templates.push(PadTemplate {
                name_template: "src".to_string(),
                direction: PadDirection::Src,
                caps: caps.parse().unwrap(),
            });
        }
        ElementDescriptor {
            name: name.to_string(),
            long_name: name.to_string(),
            klass: klass.to_string(),
            rank: 128,
            pad_templates,
        }
    }

    fn registry() -> ElementRegistry {
        let mut registry = ElementRegistry::new();
        registry.add(element(
            "vorbisenc",
            "Codec/Encoder/Audio",
            &["audio/x-raw"],
            &["audio/x-vorbis"],
        ));
        registry.add(element(
            "lamemp3enc",
            "Codec/Encoder/Audio",
            &["audio/x-raw"],
            &["audio/mpeg"],
        ));
        registry.add(element(
            "theoraenc",
            "Codec/Encoder/Video",
            &["video/x-raw"],
            &["video/x-theora"],
        ));
        registry.add(element(
            "x264enc",
            "Codec/Encoder/Video",
            &["video/x-raw"],
            &["video/x-h264"],
        ));
        registry.add(element(
            "oggmux",
            "Codec/Muxer",
            &["audio/x-vorbis; video/x-theora"],
            &["application/ogg"],
        ));
        registry.add(element(
            "matroskamux",
            "Codec/Muxer",
            &["audio/x-vorbis; audio/mpeg; video/x-theora; video/x-h264"],
            &["video/x-matroska"],
        ));
        registry
    }

    #[test]
    fn set_muxer_keeps_preferred_encoders_when_compatible() {
        let registry = registry();
        let mut settings = RenderSettings::default();
        settings.audio_encoder = "lamemp3enc".to_string();
        settings.video_encoder = "x264enc".to_string();

        assert!(settings.set_muxer(&registry, "matroskamux", None, None));
        assert_eq!(settings.audio_encoder, "lamemp3enc");
        assert_eq!(settings.video_encoder, "x264enc");
    }

    #[test]
    fn set_muxer_falls_back_to_first_compatible() {
        let registry = registry();
        let mut settings = RenderSettings::default();
        settings.audio_encoder = "lamemp3enc".to_string();
        settings.video_encoder = "x264enc".to_string();

        // Ogg takes neither of the current choices.
        assert!(settings.set_muxer(&registry, "oggmux", None, None));
        assert_eq!(settings.audio_encoder, "vorbisenc");
        assert_eq!(settings.video_encoder, "theoraenc");
    }

    #[test]
    fn set_muxer_rejects_unknown_factories() {
        let registry = registry();
        let mut settings = RenderSettings::default();
        let before = settings.muxer.clone();
        assert!(!settings.set_muxer(&registry, "nosuchmux", None, None));
        assert_eq!(settings.muxer, before);
    }

    #[test]
    fn filename_follows_the_muxer() {
        let mut settings = RenderSettings::default();
        settings.muxer = "matroskamux".to_string();
        assert_eq!(settings.filename_for("movie"), "movie.mkv");
        settings.muxer = "unknownmux".to_string();
        assert_eq!(settings.filename_for("movie"), "movie");
    }
}
