//! Element capability descriptors and their classification.
//!
//! Descriptors are opaque handles owned by the registry; the resolver only
//! filters and sorts references to them. Classification over the slash-
//! separated klass tags is expressed as a typed [`ElementKind`] instead of
//! ad hoc string-list comparisons.

use serde::{Deserialize, Serialize};

use crate::caps::MediaCaps;

/// Direction of a pad template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadDirection {
    Src,
    Sink,
}

/// A static pad template advertised by an element factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadTemplate {
    /// Template name, e.g. `src`, `sink`, `audio_%u`.
    pub name_template: String,

    /// Pad direction.
    pub direction: PadDirection,

    /// Caps this pad accepts or produces.
    pub caps: MediaCaps,
}

/// Capability descriptor for one registry element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Factory name, e.g. `matroskamux` or `vorbisenc`.
    pub name: String,

    /// Human-readable long name, e.g. `Matroska muxer`.
    pub long_name: String,

    /// Slash-separated klass tags, e.g. `Codec/Encoder/Audio`.
    pub klass: String,

    /// Numeric rank; 0 marks the element unusable for automatic selection.
    pub rank: u32,

    /// Static pad templates.
    #[serde(default)]
    pub pad_templates: Vec<PadTemplate>,
}

impl ElementDescriptor {
    /// The klass tags as a list.
    pub fn klass_tags(&self) -> Vec<&str> {
        self.klass.split('/').collect()
    }

    /// Caps of every sink pad template, in declaration order.
    pub fn sink_caps(&self) -> Vec<&MediaCaps> {
        self.pad_templates
            .iter()
            .filter(|t| t.direction == PadDirection::Sink)
            .map(|t| &t.caps)
            .collect()
    }

    /// Caps of every src pad template, in declaration order.
    pub fn src_caps(&self) -> Vec<&MediaCaps> {
        self.pad_templates
            .iter()
            .filter(|t| t.direction == PadDirection::Src)
            .map(|t| &t.caps)
            .collect()
    }

    /// Caps of the template literally named `src`, if any.
    ///
    /// Used when deriving the render profile format from an encoder.
    pub fn src_template_caps(&self) -> Option<&MediaCaps> {
        self.pad_templates
            .iter()
            .find(|t| t.direction == PadDirection::Src && t.name_template == "src")
            .map(|t| &t.caps)
    }
}

/// Typed classification of a registry element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Muxer,
    VideoEncoder,
    AudioEncoder,
    ImageEncoder,
}

impl ElementKind {
    /// Classify a descriptor from its klass tags.
    ///
    /// Muxers are `Codec` + `Muxer`; video encoders are `Codec` +
    /// `Encoder` + `Video`; image encoders (`Codec` + `Encoder` +
    /// `Image`) are listed alongside video encoders by the resolver.
    pub fn classify(descriptor: &ElementDescriptor) -> Option<ElementKind> {
        let tags = descriptor.klass_tags();
        let has = |required: &[&str]| required.iter().all(|tag| tags.contains(tag));

        if has(&["Codec", "Muxer"]) {
            Some(ElementKind::Muxer)
        } else if has(&["Codec", "Encoder", "Video"]) {
            Some(ElementKind::VideoEncoder)
        } else if has(&["Codec", "Encoder", "Image"]) {
            Some(ElementKind::ImageEncoder)
        } else if has(&["Codec", "Encoder", "Audio"]) {
            Some(ElementKind::AudioEncoder)
        } else {
            None
        }
    }

    /// Whether this kind appears in the video-encoder list.
    pub fn is_video_encoder(self) -> bool {
        matches!(self, ElementKind::VideoEncoder | ElementKind::ImageEncoder)
    }
}
