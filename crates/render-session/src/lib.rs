//! Kinocut Render Session
//!
//! Everything between "the user picked a container" and "the file is on
//! disk", as pure data and state machines:
//! - **Settings:** The render configuration ([`settings`])
//! - **Profiles:** Declarative encoding profiles ([`profile`])
//! - **Presets:** Named saved configurations ([`preset`])
//! - **Progress:** Pipeline messages, completion, ETA ([`progress`])
//!
//! Element compatibility questions are answered by
//! `kinocut-media-registry`; this crate consumes its answers.

pub mod preset;
pub mod profile;
pub mod progress;
pub mod settings;

pub use preset::{Preset, PresetError, PresetManager, NO_PRESET};
pub use profile::{build_container_profile, ContainerProfile, StreamProfile};
pub use progress::{
    compute_progress, format_eta, PipelineMessage, RenderProgress, RenderSession, SessionState,
};
pub use settings::{reselect_encoder, Framerate, RenderSettings};
