//! Error types shared across Kinocut crates.

use std::path::PathBuf;

/// Top-level error type for Kinocut operations.
#[derive(Debug, thiserror::Error)]
pub enum KinocutError {
    #[error("Registry error: {message}")]
    Registry { message: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error("Layout error: {message}")]
    Layout { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Preset error: {message}")]
    Preset { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using KinocutError.
pub type KinocutResult<T> = Result<T, KinocutError>;

impl KinocutError {
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry {
            message: msg.into(),
        }
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline {
            message: msg.into(),
        }
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn preset(msg: impl Into<String>) -> Self {
        Self::Preset {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
