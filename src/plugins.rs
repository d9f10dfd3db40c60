use std::collections::BTreeMap;

/// Renderer plugin providing the iris-specific light kinds.
pub const VENDOR_RENDER_PLUGIN: &str = "iris";
pub const CORE_RENDER_PLUGIN: &str = "core_render";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginState {
    Loaded,
    Disabled(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PluginStatus {
    pub name: String,
    pub state: PluginState,
}

impl PluginStatus {
    pub fn summary(&self) -> String {
        match &self.state {
            PluginState::Loaded => format!("{}: loaded", self.name),
            PluginState::Disabled(reason) => format!("{}: disabled ({reason})", self.name),
            PluginState::Failed(reason) => format!("{}: failed ({reason})", self.name),
        }
    }
}

/// Tracks which renderer plugins the host session has loaded. Vendor light
/// kinds are only creatable while their plugin reports [`PluginState::Loaded`].
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, PluginStatus>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self { plugins: BTreeMap::new() }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_loaded(CORE_RENDER_PLUGIN);
        registry
    }

    pub fn register_loaded(&mut self, name: &str) {
        self.plugins.insert(
            name.to_string(),
            PluginStatus { name: name.to_string(), state: PluginState::Loaded },
        );
    }

    pub fn register_disabled(&mut self, name: &str, reason: impl Into<String>) {
        self.plugins.insert(
            name.to_string(),
            PluginStatus { name: name.to_string(), state: PluginState::Disabled(reason.into()) },
        );
    }

    pub fn register_failed(&mut self, name: &str, reason: impl Into<String>) {
        self.plugins.insert(
            name.to_string(),
            PluginStatus { name: name.to_string(), state: PluginState::Failed(reason.into()) },
        );
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        matches!(self.plugins.get(name), Some(status) if status.state == PluginState::Loaded)
    }

    pub fn status(&self, name: &str) -> Option<&PluginStatus> {
        self.plugins.get(name)
    }

    pub fn statuses(&self) -> impl Iterator<Item = &PluginStatus> {
        self.plugins.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_plugins_count_as_unloaded() {
        let registry = PluginRegistry::with_defaults();
        assert!(registry.is_loaded(CORE_RENDER_PLUGIN));
        assert!(!registry.is_loaded(VENDOR_RENDER_PLUGIN));
    }

    #[test]
    fn disabled_plugins_count_as_unloaded() {
        let mut registry = PluginRegistry::new();
        registry.register_disabled(VENDOR_RENDER_PLUGIN, "license expired");
        assert!(!registry.is_loaded(VENDOR_RENDER_PLUGIN));
        let status = registry.status(VENDOR_RENDER_PLUGIN).expect("status");
        assert!(status.summary().contains("disabled"));
    }
}
