//! Kinocut Common Utilities
//!
//! Shared infrastructure for all Kinocut crates:
//! - Error types and result aliases
//! - Progress clock for render ETA estimation
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
