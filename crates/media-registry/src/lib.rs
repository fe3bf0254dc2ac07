//! Kinocut Media Registry
//!
//! Models the element registry the render dialog draws from:
//! - **Caps:** Structured media-type descriptors with intersection
//! - **Descriptors:** Encoder/muxer capability handles with klass tags,
//!   pad templates, and rank
//! - **Compatibility:** Which encoders can feed which containers
//! - **Naming:** Human-friendly display names and file extensions
//!
//! This crate is pure computation — no media I/O. The actual encoding
//! pipeline lives behind the external engine; Kinocut only resolves what
//! the engine advertises.

pub mod caps;
pub mod compat;
pub mod descriptor;
pub mod naming;
pub mod registry;

pub use caps::{CapsStructure, CapsValue, MediaCaps};
pub use compat::{available_combinations, compatible_encoders, CombinationTable};
pub use descriptor::{ElementDescriptor, ElementKind, PadDirection, PadTemplate};
pub use naming::{beautify_factory_name, extension_for_muxer, factory_list};
pub use registry::{CachedEncoderList, ElementRegistry};
