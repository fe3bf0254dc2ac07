//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where render presets are stored.
    pub presets_dir: PathBuf,

    /// Timeline layout defaults.
    pub layout: LayoutDefaults,

    /// Render dialog defaults.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// User-tunable timeline layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDefaults {
    /// Threshold (in pixels) at which two clips snap together when
    /// dragging or trimming.
    pub edge_snap_deadband_px: u64,

    /// Default clip length (in milliseconds) of still images when
    /// inserting on the timeline.
    pub image_clip_length_ms: u64,
}

/// Default render parameters used when a project carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    /// Default container (muxer factory name).
    pub muxer: String,

    /// Default audio encoder factory name.
    pub audio_encoder: String,

    /// Default video encoder factory name.
    pub video_encoder: String,

    /// Last folder a render was exported to.
    pub last_export_folder: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "kinocut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presets_dir: default_presets_dir(),
            layout: LayoutDefaults::default(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            edge_snap_deadband_px: 5,
            image_clip_length_ms: 1000,
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            muxer: "oggmux".to_string(),
            audio_encoder: "vorbisenc".to_string(),
            video_encoder: "theoraenc".to_string(),
            last_export_folder: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    xdg_base("XDG_CONFIG_HOME", ".config")
        .join("kinocut")
        .join("config.json")
}

/// Default render preset directory.
fn default_presets_dir() -> PathBuf {
    xdg_base("XDG_DATA_HOME", ".local/share")
        .join("kinocut")
        .join("presets")
}

fn xdg_base(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(fallback)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.layout.edge_snap_deadband_px, 5);
        assert_eq!(config.layout.image_clip_length_ms, 1000);
        assert!(!config.render.muxer.is_empty());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.render.muxer, config.render.muxer);
    }
}
