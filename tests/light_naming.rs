use lumenforge::light_creator::{create_lights, LightRequest};
use lumenforge::naming::{self, FunctionTag, LightType, ROOT_GROUP_NAME};
use lumenforge::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use lumenforge::scene_graph::{NodeKind, SceneGraph, OBJECT_SET_PORT};
use lumenforge::undo::UndoStack;

fn loaded_plugins() -> PluginRegistry {
    let mut plugins = PluginRegistry::with_defaults();
    plugins.register_loaded(VENDOR_RENDER_PLUGIN);
    plugins
}

fn request(light_type: LightType) -> LightRequest {
    LightRequest::new(light_type)
}

#[test]
fn every_kind_names_lights_by_the_convention() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();

    for light_type in LightType::ALL {
        let created =
            create_lights(&mut graph, &plugins, &mut undo, &request(light_type)).expect("create");
        assert_eq!(created.len(), 1);
        let name = graph.name(created[0]);
        assert!(naming::matches_convention(name), "{name} violates the convention");
        assert!(name.ends_with(light_type.suffix()));
    }
}

#[test]
fn collision_bumps_the_index() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();
    graph.create_group("foo_key_C_001_POIT").expect("seed");

    let mut point = request(LightType::Point);
    point.basename = Some("foo".to_string());
    point.function = FunctionTag::Key;
    let created = create_lights(&mut graph, &plugins, &mut undo, &point).expect("create");
    assert_eq!(graph.name(created[0]), "foo_key_C_002_POIT");
}

#[test]
fn empty_basename_falls_back_to_the_type_name() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();

    let mut spot = request(LightType::Spot);
    spot.basename = Some("   ".to_string());
    let created = create_lights(&mut graph, &plugins, &mut undo, &spot).expect("create");
    assert_eq!(graph.name(created[0]), "spotLight_key_C_001_SPTL");
}

#[test]
fn selection_drives_batch_creation_and_basenames() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();
    let a = graph.create_group("a_x").expect("a_x");
    let b = graph.create_group("b_y").expect("b_y");
    let c = graph.create_group("c_z").expect("c_z");
    graph.select(vec![a, b, c]);

    let mut point = request(LightType::Point);
    point.use_selection = true;
    let created = create_lights(&mut graph, &plugins, &mut undo, &point).expect("create");
    assert_eq!(created.len(), 3);

    let names: Vec<&str> = created.iter().map(|&id| graph.name(id)).collect();
    assert_eq!(names, vec!["a_key_C_001_POIT", "b_key_C_001_POIT", "c_key_C_001_POIT"]);

    let root = graph.find(ROOT_GROUP_NAME).expect("root group");
    for &id in &created {
        assert_eq!(graph.parent(id), Some(root));
    }
    assert_eq!(graph.selection(), created.as_slice());
}

#[test]
fn vendor_kind_without_plugin_mutates_nothing() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = PluginRegistry::with_defaults();
    let nodes_before = graph.node_count();
    let connections_before = graph.connection_count();

    let created =
        create_lights(&mut graph, &plugins, &mut undo, &request(LightType::IrisArea)).expect("call");
    assert!(created.is_empty());
    assert_eq!(graph.node_count(), nodes_before);
    assert_eq!(graph.connection_count(), connections_before);
    assert!(!undo.can_undo());
}

#[test]
fn empty_selection_mutates_nothing() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();
    let nodes_before = graph.node_count();

    let mut point = request(LightType::Point);
    point.use_selection = true;
    let created = create_lights(&mut graph, &plugins, &mut undo, &point).expect("call");
    assert!(created.is_empty());
    assert_eq!(graph.node_count(), nodes_before);
    assert!(!undo.can_undo());
}

#[test]
fn repeated_creation_reuses_one_root_group() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();

    create_lights(&mut graph, &plugins, &mut undo, &request(LightType::Point)).expect("first");
    create_lights(&mut graph, &plugins, &mut undo, &request(LightType::Directional)).expect("second");

    let root_groups = graph
        .nodes()
        .filter(|(_, node)| node.name == ROOT_GROUP_NAME && node.kind == NodeKind::Group)
        .count();
    assert_eq!(root_groups, 1);
}

#[test]
fn illuminate_toggle_controls_the_default_link() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();

    let lit = create_lights(&mut graph, &plugins, &mut undo, &request(LightType::Point))
        .expect("lit")[0];
    assert!(graph.downstream_connection(lit, OBJECT_SET_PORT).is_some());

    let mut dark_request = request(LightType::Point);
    dark_request.illuminate = false;
    let dark = create_lights(&mut graph, &plugins, &mut undo, &dark_request).expect("dark")[0];
    assert!(graph.downstream_connection(dark, OBJECT_SET_PORT).is_none());
}
