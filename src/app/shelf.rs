use super::panel_registry::LIGHT_PANEL_ID;
use crate::naming;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfAction {
    OpenPanel { panel_id: String },
}

#[derive(Debug, Clone)]
pub struct ShelfEntry {
    pub id: String,
    pub label: String,
    pub icon: PathBuf,
    pub action: ShelfAction,
}

/// One-click launchers shown along the top of the editor window.
#[derive(Debug, Default)]
pub struct ToolShelf {
    entries: Vec<ShelfEntry>,
}

impl ToolShelf {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add(&mut self, entry: ShelfEntry) -> Result<()> {
        if self.entries.iter().any(|existing| existing.id == entry.id) {
            bail!("shelf entry '{}' is already registered", entry.id);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }
}

/// Registration entry point for the light creator: locates the bundled icon,
/// verifies the tool's support code, and installs the launcher.
pub fn register_light_creator(shelf: &mut ToolShelf, resources_dir: &Path) -> Result<()> {
    let icon = resources_dir.join("icons").join("light_creator.svg");
    if !icon.is_file() {
        bail!("light creator icon missing at {}", icon.display());
    }
    naming::validate_suffix_table().context("light creator support code failed validation")?;
    shelf.add(ShelfEntry {
        id: "shelf.light_creator".to_string(),
        label: "Lights".to_string(),
        icon,
        action: ShelfAction::OpenPanel { panel_id: LIGHT_PANEL_ID.to_string() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn registration_requires_the_icon_asset() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut shelf = ToolShelf::new();
        let err = register_light_creator(&mut shelf, dir.path()).expect_err("missing icon");
        assert!(err.to_string().contains("icon missing"));
        assert!(shelf.entries().is_empty());
    }

    #[test]
    fn registration_installs_one_launcher() {
        let dir = tempfile::tempdir().expect("temp dir");
        let icons = dir.path().join("icons");
        fs::create_dir_all(&icons).expect("icons dir");
        fs::write(icons.join("light_creator.svg"), b"<svg/>").expect("icon");

        let mut shelf = ToolShelf::new();
        register_light_creator(&mut shelf, dir.path()).expect("register");
        assert_eq!(shelf.entries().len(), 1);
        let entry = &shelf.entries()[0];
        assert_eq!(entry.action, ShelfAction::OpenPanel { panel_id: LIGHT_PANEL_ID.to_string() });

        let err = register_light_creator(&mut shelf, dir.path()).expect_err("duplicate");
        assert!(err.to_string().contains("already registered"));
    }
}
