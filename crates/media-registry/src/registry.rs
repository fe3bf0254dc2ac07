//! The element registry and the cached encoder classification.
//!
//! The registry is append-only: the external engine only ever reports
//! feature additions. Every addition bumps a revision counter; the cached
//! classification compares revisions and rebuilds lazily on next access
//! rather than eagerly on change.

use serde::{Deserialize, Serialize};

use crate::descriptor::{ElementDescriptor, ElementKind};

/// Enumerable collection of element descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementRegistry {
    descriptors: Vec<ElementDescriptor>,

    /// Bumped on every addition; consumed by caches.
    #[serde(skip)]
    revision: u64,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a snapshot of descriptors.
    pub fn from_descriptors(descriptors: Vec<ElementDescriptor>) -> Self {
        Self {
            descriptors,
            revision: 0,
        }
    }

    /// Register a newly advertised element ("feature added").
    pub fn add(&mut self, descriptor: ElementDescriptor) {
        tracing::debug!(name = %descriptor.name, "registry feature added");
        self.descriptors.push(descriptor);
        self.revision += 1;
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[ElementDescriptor] {
        &self.descriptors
    }

    /// Look up a descriptor by factory name.
    pub fn lookup(&self, name: &str) -> Option<&ElementDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Current revision; changes whenever a feature is added.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Lazily rebuilt classification of the registry into muxers and encoders.
///
/// Holds indices into the registry rather than clones; the registry is
/// append-only so indices stay valid across additions.
#[derive(Debug, Default)]
pub struct CachedEncoderList {
    built_at: Option<u64>,
    muxers: Vec<usize>,
    audio_encoders: Vec<usize>,
    video_encoders: Vec<usize>,
}

impl CachedEncoderList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_built(&mut self, registry: &ElementRegistry) {
        if self.built_at == Some(registry.revision()) {
            return;
        }
        self.muxers.clear();
        self.audio_encoders.clear();
        self.video_encoders.clear();
        for (index, descriptor) in registry.descriptors().iter().enumerate() {
            match ElementKind::classify(descriptor) {
                Some(ElementKind::Muxer) => self.muxers.push(index),
                Some(kind) if kind.is_video_encoder() => self.video_encoders.push(index),
                Some(ElementKind::AudioEncoder) => self.audio_encoders.push(index),
                _ => {}
            }
        }
        self.built_at = Some(registry.revision());
        tracing::debug!(
            muxers = self.muxers.len(),
            audio = self.audio_encoders.len(),
            video = self.video_encoders.len(),
            "rebuilt encoder classification"
        );
    }

    /// All muxers, in registry order.
    pub fn muxers<'a>(&mut self, registry: &'a ElementRegistry) -> Vec<&'a ElementDescriptor> {
        self.ensure_built(registry);
        self.resolve(registry, &self.muxers)
    }

    /// All audio encoders, in registry order.
    pub fn audio_encoders<'a>(
        &mut self,
        registry: &'a ElementRegistry,
    ) -> Vec<&'a ElementDescriptor> {
        self.ensure_built(registry);
        self.resolve(registry, &self.audio_encoders)
    }

    /// All video and image encoders, in registry order.
    pub fn video_encoders<'a>(
        &mut self,
        registry: &'a ElementRegistry,
    ) -> Vec<&'a ElementDescriptor> {
        self.ensure_built(registry);
        self.resolve(registry, &self.video_encoders)
    }

    fn resolve<'a>(
        &self,
        registry: &'a ElementRegistry,
        indices: &[usize],
    ) -> Vec<&'a ElementDescriptor> {
        indices
            .iter()
            .map(|&i| &registry.descriptors()[i])
            .collect()
    }
}
