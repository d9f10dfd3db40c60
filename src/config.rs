use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Lumenforge".to_string(), width: 1280, height: 720, vsync: true }
    }
}

/// The three visual arrangements of the light panel. Presentation only; the
/// controls and their semantics are identical in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelLayout {
    Vertical,
    Horizontal,
    Grid,
}

impl PanelLayout {
    pub fn label(self) -> &'static str {
        match self {
            PanelLayout::Vertical => "Vertical",
            PanelLayout::Horizontal => "Horizontal",
            PanelLayout::Grid => "Grid",
        }
    }
}

impl Default for PanelLayout {
    fn default() -> Self {
        PanelLayout::Vertical
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub preferred_layout: PanelLayout,
    #[serde(default = "EditorConfig::default_ui_scale")]
    pub ui_scale: f32,
    #[serde(default = "EditorConfig::default_event_log_limit")]
    pub event_log_limit: usize,
    #[serde(default = "EditorConfig::default_settings_dir")]
    pub settings_dir: String,
    #[serde(default = "EditorConfig::default_resources_dir")]
    pub resources_dir: String,
}

impl EditorConfig {
    fn default_ui_scale() -> f32 {
        1.0
    }

    const fn default_event_log_limit() -> usize {
        32
    }

    fn default_settings_dir() -> String {
        "config/user".to_string()
    }

    fn default_resources_dir() -> String {
        "resources".to_string()
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preferred_layout: PanelLayout::default(),
            ui_scale: Self::default_ui_scale(),
            event_log_limit: Self::default_event_log_limit(),
            settings_dir: Self::default_settings_dir(),
            resources_dir: Self::default_resources_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "SceneConfig::default_path")]
    pub path: String,
    #[serde(default = "SceneConfig::default_save_on_exit")]
    pub save_on_exit: bool,
}

impl SceneConfig {
    fn default_path() -> String {
        "scenes/stage.json".to_string()
    }

    const fn default_save_on_exit() -> bool {
        true
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { path: Self::default_path(), save_on_exit: Self::default_save_on_exit() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    #[serde(default = "PluginsConfig::default_load")]
    pub load: Vec<String>,
}

impl PluginsConfig {
    fn default_load() -> Vec<String> {
        vec!["iris".to_string()]
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self { load: Self::default_load() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub scene: Option<String>,
    pub settings_dir: Option<String>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(scene) = &overrides.scene {
            self.scene.path = scene.clone();
        }
        if let Some(settings_dir) = &overrides.settings_dir {
            self.editor.settings_dir = settings_dir.clone();
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.vsync.is_none()
            && self.scene.is_none()
            && self.settings_dir.is_none()
    }
}
