use super::light_panel::LightCreatorPanel;
use crate::config::PanelLayout;
use crate::settings::{PanelPlacement, SettingsStore};
use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Stable identifier of the light creator panel; its persisted state lives
/// under `light_panel_state` in the settings store.
pub const LIGHT_PANEL_ID: &str = "light_panel";

pub struct PanelEntry {
    pub panel: LightCreatorPanel,
    pub placement: PanelPlacement,
}

/// Owns panel instances keyed by stable identifier, with explicit create and
/// destroy lifecycle calls. Placement is restored from the settings store on
/// create and written back on destroy.
#[derive(Default)]
pub struct PanelRegistry {
    panels: BTreeMap<String, PanelEntry>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self { panels: BTreeMap::new() }
    }

    pub fn create(
        &mut self,
        id: &str,
        settings: &SettingsStore,
        default_layout: PanelLayout,
    ) -> Result<&mut PanelEntry> {
        if self.panels.contains_key(id) {
            bail!("panel '{id}' is already registered");
        }
        let placement = match settings.load::<PanelPlacement>(Self::state_key(id).as_str()) {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                PanelPlacement { layout: default_layout, ..PanelPlacement::default() }
            }
            Err(err) => {
                log::warn!("panel '{id}' state unreadable, using defaults: {err:?}");
                PanelPlacement { layout: default_layout, ..PanelPlacement::default() }
            }
        };
        let panel = LightCreatorPanel::new(placement.layout, placement.open);
        let entry = self.panels.entry(id.to_string()).or_insert(PanelEntry { panel, placement });
        Ok(entry)
    }

    pub fn destroy(&mut self, id: &str, settings: &SettingsStore) -> Result<()> {
        let Some(entry) = self.panels.remove(id) else {
            bail!("panel '{id}' is not registered");
        };
        settings.save(Self::state_key(id).as_str(), &entry.placement)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PanelEntry> {
        self.panels.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.panels.contains_key(id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut PanelEntry)> {
        self.panels.iter_mut()
    }

    /// Persists every live panel without destroying it; used at shutdown.
    pub fn persist_all(&self, settings: &SettingsStore) {
        for (id, entry) in &self.panels {
            if let Err(err) = settings.save(Self::state_key(id).as_str(), &entry.placement) {
                log::warn!("failed to persist panel '{id}' state: {err:?}");
            }
        }
    }

    fn state_key(id: &str) -> String {
        format!("{id}_state")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PANEL_STATE_KEY;

    #[test]
    fn create_restores_persisted_placement() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = SettingsStore::new(dir.path());
        let saved = PanelPlacement {
            x: 10.0,
            y: 20.0,
            width: 321.0,
            height: 456.0,
            open: false,
            layout: PanelLayout::Horizontal,
        };
        settings.save(PANEL_STATE_KEY, &saved).expect("seed state");

        let mut registry = PanelRegistry::new();
        let entry =
            registry.create(LIGHT_PANEL_ID, &settings, PanelLayout::Vertical).expect("create");
        assert_eq!(entry.placement, saved);
        assert!(!entry.panel.is_open());
    }

    #[test]
    fn double_create_is_rejected_and_destroy_persists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = SettingsStore::new(dir.path());
        let mut registry = PanelRegistry::new();
        registry.create(LIGHT_PANEL_ID, &settings, PanelLayout::Vertical).expect("create");
        assert!(registry.create(LIGHT_PANEL_ID, &settings, PanelLayout::Vertical).is_err());

        registry.get_mut(LIGHT_PANEL_ID).expect("entry").placement.x = 99.0;
        registry.destroy(LIGHT_PANEL_ID, &settings).expect("destroy");
        assert!(!registry.contains(LIGHT_PANEL_ID));
        let reloaded: PanelPlacement =
            settings.load(PANEL_STATE_KEY).expect("load").expect("present");
        assert_eq!(reloaded.x, 99.0);
    }
}
