//! Named render presets with file-per-preset persistence.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kinocut_common::error::KinocutResult;

use crate::settings::RenderSettings;

/// Display name of the live "no preset selected" entry. It is prepended
/// to the entry list at display time and never stored.
pub const NO_PRESET: &str = "No preset";

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("a preset named {0:?} already exists")]
    DuplicateName(String),

    #[error("no preset named {0:?}")]
    NotFound(String),
}

/// A saved render configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub settings: RenderSettings,

    /// Last time the preset was written.
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

/// Ordered, unique-by-name collection of presets backed by one JSON
/// file per preset.
#[derive(Debug)]
pub struct PresetManager {
    presets: Vec<Preset>,
    presets_dir: PathBuf,
    current: Option<String>,
    dirty: bool,
}

impl PresetManager {
    /// Load every readable preset file from `presets_dir`, sorted by
    /// name. Unreadable files are skipped with a diagnostic.
    pub fn load(presets_dir: impl Into<PathBuf>) -> KinocutResult<Self> {
        let presets_dir = presets_dir.into();
        let mut presets = Vec::new();
        if presets_dir.is_dir() {
            for entry in std::fs::read_dir(&presets_dir)? {
                let path = entry?.path();
                if path.extension().map_or(true, |ext| ext != "json") {
                    continue;
                }
                match read_preset(&path) {
                    Ok(preset) => presets.push(preset),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "skipping unreadable preset");
                    }
                }
            }
        }
        presets.sort_by(|a, b| a.name.cmp(&b.name));
        presets.dedup_by(|a, b| a.name == b.name);
        Ok(Self {
            presets,
            presets_dir,
            current: None,
            dirty: false,
        })
    }

    /// In-memory manager for tests and previews.
    pub fn in_memory() -> Self {
        Self {
            presets: Vec::new(),
            presets_dir: PathBuf::new(),
            current: None,
            dirty: false,
        }
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Entry names for a chooser, with the live [`NO_PRESET`] entry
    /// first.
    pub fn display_entries(&self) -> Vec<String> {
        let mut entries = Vec::with_capacity(self.presets.len() + 1);
        entries.push(NO_PRESET.to_string());
        entries.extend(self.presets.iter().map(|p| p.name.clone()));
        entries
    }

    /// First free name in the `New preset`, `New preset 1`, ... series.
    pub fn new_preset_name(&self) -> String {
        let base = "New preset".to_string();
        if self.preset(&base).is_none() {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("New preset {n}");
            if self.preset(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Add a preset and persist it.
    pub fn add(&mut self, name: &str, settings: RenderSettings) -> Result<(), PresetError> {
        if name == NO_PRESET || self.preset(name).is_some() {
            return Err(PresetError::DuplicateName(name.to_string()));
        }
        let preset = Preset {
            name: name.to_string(),
            settings,
            modified_at: Utc::now(),
        };
        self.write_preset(&preset);
        self.presets.push(preset);
        self.presets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Rename a preset, moving its file. The new name must be unused.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), PresetError> {
        if new == NO_PRESET || self.preset(new).is_some() {
            return Err(PresetError::DuplicateName(new.to_string()));
        }
        let Some(preset) = self.presets.iter_mut().find(|p| p.name == old) else {
            return Err(PresetError::NotFound(old.to_string()));
        };
        preset.name = new.to_string();
        preset.modified_at = Utc::now();
        let preset = preset.clone();

        let old_path = self.preset_path(old);
        if old_path.exists() {
            if let Err(err) = std::fs::remove_file(&old_path) {
                tracing::warn!(path = %old_path.display(), error = %err, "failed to delete preset file");
            }
        }
        self.write_preset(&preset);
        if self.current.as_deref() == Some(old) {
            self.current = Some(new.to_string());
        }
        self.presets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Remove a preset and its file.
    pub fn remove(&mut self, name: &str) -> Result<(), PresetError> {
        let Some(index) = self.presets.iter().position(|p| p.name == name) else {
            return Err(PresetError::NotFound(name.to_string()));
        };
        self.presets.remove(index);
        let path = self.preset_path(name);
        if path.exists() {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to delete preset file");
            }
        }
        if self.current.as_deref() == Some(name) {
            self.current = None;
            self.dirty = false;
        }
        Ok(())
    }

    // ---- Current preset and sensitivity --------------------------------

    /// Select a preset (or none) as the editing target. Selecting
    /// [`NO_PRESET`] clears the selection.
    pub fn select(&mut self, name: Option<&str>) {
        self.current = name
            .filter(|n| *n != NO_PRESET && self.preset(n).is_some())
            .map(str::to_string);
        self.dirty = false;
    }

    pub fn current(&self) -> Option<&Preset> {
        self.current.as_deref().and_then(|n| self.preset(n))
    }

    /// Flag the selected preset as edited.
    pub fn mark_modified(&mut self) {
        if self.current.is_some() {
            self.dirty = true;
        }
    }

    /// Saving makes sense only for a selected, edited preset.
    pub fn can_save(&self) -> bool {
        self.current.is_some() && self.dirty
    }

    /// Removal needs a selected preset.
    pub fn can_remove(&self) -> bool {
        self.current.is_some()
    }

    /// Write the edited settings back into the selected preset.
    pub fn save_current(&mut self, settings: &RenderSettings) -> Result<(), PresetError> {
        let Some(name) = self.current.clone() else {
            return Err(PresetError::NotFound(NO_PRESET.to_string()));
        };
        let Some(preset) = self.presets.iter_mut().find(|p| p.name == name) else {
            return Err(PresetError::NotFound(name));
        };
        preset.settings = settings.clone();
        preset.modified_at = Utc::now();
        let preset = preset.clone();
        self.write_preset(&preset);
        self.dirty = false;
        Ok(())
    }

    // ---- Persistence ---------------------------------------------------

    fn preset_path(&self, name: &str) -> PathBuf {
        use std::hash::{Hash, Hasher};

        let stem: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        // Distinct names can sanitize to the same stem ("Web HD" and
        // "Web_HD"); a suffix derived from the exact name keeps their
        // files apart.
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        name.hash(&mut hasher);
        let suffix = hasher.finish() as u32;
        self.presets_dir.join(format!("{stem}-{suffix:08x}.json"))
    }

    fn write_preset(&self, preset: &Preset) {
        if self.presets_dir.as_os_str().is_empty() {
            return;
        }
        let path = self.preset_path(&preset.name);
        let result = std::fs::create_dir_all(&self.presets_dir)
            .and_then(|_| {
                serde_json::to_string_pretty(preset)
                    .map_err(std::io::Error::other)
            })
            .and_then(|json| std::fs::write(&path, json));
        if let Err(err) = result {
            tracing::warn!(path = %path.display(), error = %err, "failed to persist preset");
        }
    }
}

fn read_preset(path: &Path) -> KinocutResult<Preset> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_preset_entry_is_always_first() {
        let mut manager = PresetManager::in_memory();
        manager.add("Web", RenderSettings::default()).unwrap();
        let entries = manager.display_entries();
        assert_eq!(entries[0], NO_PRESET);
        assert_eq!(entries[1], "Web");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut manager = PresetManager::in_memory();
        manager.add("Web", RenderSettings::default()).unwrap();
        assert!(matches!(
            manager.add("Web", RenderSettings::default()),
            Err(PresetError::DuplicateName(_))
        ));
        assert!(matches!(
            manager.add(NO_PRESET, RenderSettings::default()),
            Err(PresetError::DuplicateName(_))
        ));
    }

    #[test]
    fn new_names_count_upward() {
        let mut manager = PresetManager::in_memory();
        assert_eq!(manager.new_preset_name(), "New preset");
        manager
            .add("New preset", RenderSettings::default())
            .unwrap();
        assert_eq!(manager.new_preset_name(), "New preset 1");
        manager
            .add("New preset 1", RenderSettings::default())
            .unwrap();
        assert_eq!(manager.new_preset_name(), "New preset 2");
    }

    #[test]
    fn sensitivity_tracks_selection_and_edits() {
        let mut manager = PresetManager::in_memory();
        manager.add("Web", RenderSettings::default()).unwrap();

        assert!(!manager.can_save());
        assert!(!manager.can_remove());

        manager.select(Some("Web"));
        assert!(!manager.can_save());
        assert!(manager.can_remove());

        manager.mark_modified();
        assert!(manager.can_save());

        manager.save_current(&RenderSettings::default()).unwrap();
        assert!(!manager.can_save());

        manager.select(Some(NO_PRESET));
        assert!(!manager.can_remove());
    }

    #[test]
    fn rename_rejects_collisions_and_follows_selection() {
        let mut manager = PresetManager::in_memory();
        manager.add("Web", RenderSettings::default()).unwrap();
        manager.add("Archive", RenderSettings::default()).unwrap();
        manager.select(Some("Web"));

        assert!(matches!(
            manager.rename("Web", "Archive"),
            Err(PresetError::DuplicateName(_))
        ));
        manager.rename("Web", "Web HD").unwrap();
        assert!(manager.preset("Web").is_none());
        assert_eq!(manager.current().unwrap().name, "Web HD");
    }

    #[test]
    fn remove_clears_a_matching_selection() {
        let mut manager = PresetManager::in_memory();
        manager.add("Web", RenderSettings::default()).unwrap();
        manager.select(Some("Web"));
        manager.remove("Web").unwrap();
        assert!(manager.current().is_none());
        assert!(matches!(
            manager.remove("Web"),
            Err(PresetError::NotFound(_))
        ));
    }

    #[test]
    fn names_with_the_same_sanitized_stem_keep_separate_files() {
        let dir = std::env::temp_dir().join(format!("kinocut-stems-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut manager = PresetManager::load(&dir).unwrap();
        manager.add("Web HD", RenderSettings::default()).unwrap();
        manager.add("Web_HD", RenderSettings::default()).unwrap();

        let reloaded = PresetManager::load(&dir).unwrap();
        assert_eq!(reloaded.presets().len(), 2);
        assert!(reloaded.preset("Web HD").is_some());
        assert!(reloaded.preset("Web_HD").is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn round_trips_through_the_filesystem() {
        let dir = std::env::temp_dir().join(format!("kinocut-presets-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut manager = PresetManager::load(&dir).unwrap();
        let mut settings = RenderSettings::default();
        settings.muxer = "matroskamux".to_string();
        manager.add("Archive", settings).unwrap();

        let reloaded = PresetManager::load(&dir).unwrap();
        assert_eq!(reloaded.presets().len(), 1);
        assert_eq!(reloaded.preset("Archive").unwrap().settings.muxer, "matroskamux");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
