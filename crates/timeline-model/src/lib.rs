//! Kinocut Timeline Model
//!
//! The edited-project model the viewport engine binds to:
//! - **Clips:** Media items with start/duration/in-point and a track type
//! - **Layers:** Priority-ordered containers of clips
//! - **Events:** A strictly ordered change queue drained by a dispatcher
//!
//! The model performs no media processing; it records editing decisions
//! and reports every mutation as a typed event. Positions are in
//! nanoseconds throughout.

pub mod clip;
pub mod event;
pub mod timeline;

pub use clip::*;
pub use event::*;
pub use timeline::*;
