use crate::naming::{self, FunctionTag, LightType, ROOT_GROUP_NAME};
use crate::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use crate::scene_graph::{NodeId, NodeKind, SceneGraph, OBJECT_SET_PORT};
use crate::undo::UndoStack;
use anyhow::{anyhow, bail, Result};
use log::{info, warn};

/// One user action from the panel: which kind to create, under which naming
/// function, and the toggle snapshot taken at click time.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRequest {
    pub light_type: LightType,
    pub function: FunctionTag,
    pub use_selection: bool,
    pub illuminate: bool,
    pub basename: Option<String>,
}

impl LightRequest {
    pub fn new(light_type: LightType) -> Self {
        Self {
            light_type,
            function: FunctionTag::default(),
            use_selection: false,
            illuminate: true,
            basename: None,
        }
    }
}

/// Creates one light per selected node (or a single light), renames each to a
/// unique convention name, and parents them under the root group.
///
/// Precondition failures (vendor plugin unloaded, empty selection) are logged
/// and return an empty list without touching the scene. Everything after the
/// first mutation runs inside one undo scope; a mid-batch error leaves the
/// partial work on the undo stack as a single reversible unit.
pub fn create_lights(
    graph: &mut SceneGraph,
    plugins: &PluginRegistry,
    undo: &mut UndoStack,
    request: &LightRequest,
) -> Result<Vec<NodeId>> {
    if request.light_type.is_vendor() && !plugins.is_loaded(VENDOR_RENDER_PLUGIN) {
        warn!(
            "{} needs the '{VENDOR_RENDER_PLUGIN}' render plugin, which is not loaded",
            request.light_type.type_name()
        );
        return Ok(Vec::new());
    }

    let selected: Vec<NodeId> = graph.selection().to_vec();
    if request.use_selection && selected.is_empty() {
        warn!("nothing selected");
        return Ok(Vec::new());
    }

    let count = if request.use_selection { selected.len() } else { 1 };
    let scope = undo.begin(graph, format!("create {}", request.light_type.type_name()));
    let mut created = Vec::with_capacity(count);

    for slot in 0..count {
        let shape = graph.create_light(request.light_type);
        let transform = match graph.kind(shape) {
            NodeKind::Transform => shape,
            _ => graph
                .parent(shape)
                .ok_or_else(|| anyhow!("light shape '{}' has no transform", graph.name(shape)))?,
        };

        if !request.illuminate {
            graph.break_connection(transform, OBJECT_SET_PORT);
        }

        let basename = if request.use_selection {
            let selected_name = graph.name(selected[slot]);
            selected_name.split('_').next().unwrap_or(selected_name).to_string()
        } else {
            match request.basename.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => request.light_type.type_name().to_string(),
            }
        };

        let resolved =
            naming::resolve_unique(&basename, request.function, request.light_type, |name| {
                graph.exists(name)
            })?;
        graph.rename(transform, &resolved)?;

        let root = ensure_root_group(graph)?;
        graph.reparent(transform, root)?;
        created.push(transform);
    }

    graph.select(created.clone());
    drop(scope);
    info!("created {} light(s)", created.len());
    Ok(created)
}

/// Finds the root container, creating it as an empty group on first use. A
/// same-named node of another kind is a hard error rather than a silent nest.
fn ensure_root_group(graph: &mut SceneGraph) -> Result<NodeId> {
    match graph.find(ROOT_GROUP_NAME) {
        Some(id) if graph.kind(id) == NodeKind::Group => Ok(id),
        Some(id) => bail!(
            "scene node '{ROOT_GROUP_NAME}' exists but is a {:?}, not a group",
            graph.kind(id)
        ),
        None => graph.create_group(ROOT_GROUP_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_plugins() -> PluginRegistry {
        let mut plugins = PluginRegistry::with_defaults();
        plugins.register_loaded(VENDOR_RENDER_PLUGIN);
        plugins
    }

    #[test]
    fn root_group_is_created_once() {
        let mut graph = SceneGraph::new();
        let mut undo = UndoStack::default();
        let plugins = loaded_plugins();
        let request = LightRequest::new(LightType::Point);

        create_lights(&mut graph, &plugins, &mut undo, &request).expect("first");
        create_lights(&mut graph, &plugins, &mut undo, &request).expect("second");

        let roots: Vec<_> =
            graph.nodes().filter(|(_, node)| node.name == ROOT_GROUP_NAME).collect();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn root_group_name_clash_is_a_hard_error() {
        let mut graph = SceneGraph::new();
        let mut undo = UndoStack::default();
        let plugins = loaded_plugins();
        let squatter = graph.create_light(LightType::Point);
        let transform = graph.parent(squatter).expect("transform");
        graph.rename(transform, ROOT_GROUP_NAME).expect("rename");

        let err = create_lights(&mut graph, &plugins, &mut undo, &LightRequest::new(LightType::Spot))
            .expect_err("clash");
        assert!(err.to_string().contains("not a group"));
        // The failed batch is still one undoable unit.
        assert!(undo.can_undo());
    }
}
