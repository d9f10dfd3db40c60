use crate::config::PanelLayout;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key the light panel's docked state is stored under.
pub const PANEL_STATE_KEY: &str = "light_panel_state";

/// Per-user settings directory: one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    root: PathBuf,
}

impl SettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Missing keys are `Ok(None)`; a present-but-corrupt file is an error so
    /// callers can decide whether to fall back or surface it.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes =
            fs::read(&path).with_context(|| format!("Reading settings file {}", path.display()))?;
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("Parsing settings file {}", path.display()))?;
        Ok(Some(value))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating settings directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json.as_bytes())
            .with_context(|| format!("Writing settings file {}", path.display()))?;
        Ok(())
    }
}

/// Docked geometry and visibility of a panel, persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub open: bool,
    #[serde(default)]
    pub layout: PanelLayout,
}

impl Default for PanelPlacement {
    fn default() -> Self {
        Self { x: 60.0, y: 60.0, width: 300.0, height: 440.0, open: true, layout: PanelLayout::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SettingsStore::new(dir.path());
        let placement = PanelPlacement {
            x: 12.0,
            y: 34.0,
            width: 256.0,
            height: 512.0,
            open: false,
            layout: PanelLayout::Grid,
        };
        store.save(PANEL_STATE_KEY, &placement).expect("save");
        let loaded: PanelPlacement =
            store.load(PANEL_STATE_KEY).expect("load").expect("present");
        assert_eq!(loaded, placement);
    }

    #[test]
    fn missing_keys_load_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SettingsStore::new(dir.path());
        let loaded: Option<PanelPlacement> = store.load("never_written").expect("load");
        assert!(loaded.is_none());
    }
}
