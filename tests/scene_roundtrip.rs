use lumenforge::light_creator::{create_lights, LightRequest};
use lumenforge::naming::LightType;
use lumenforge::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use lumenforge::scene_graph::{NodeKind, SceneGraph, OBJECT_SET_PORT};
use lumenforge::undo::UndoStack;

#[test]
fn scene_with_lights_round_trips_through_json() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let mut plugins = PluginRegistry::with_defaults();
    plugins.register_loaded(VENDOR_RENDER_PLUGIN);

    create_lights(&mut graph, &plugins, &mut undo, &LightRequest::new(LightType::Point))
        .expect("point");
    let mut dark = LightRequest::new(LightType::IrisSkyDome);
    dark.illuminate = false;
    create_lights(&mut graph, &plugins, &mut undo, &dark).expect("dome");

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let scene_path = temp_dir.path().join("stage.json");
    graph.save_to_path(&scene_path).expect("save scene");

    let loaded = SceneGraph::load_from_path(&scene_path).expect("load scene");
    assert_eq!(loaded, graph);
}

#[test]
fn load_rejects_duplicate_names() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let scene_path = temp_dir.path().join("broken.json");
    let mut graph = SceneGraph::new();
    graph.create_group("grp").expect("group");
    graph.save_to_path(&scene_path).expect("save");
    let text = std::fs::read_to_string(&scene_path)
        .expect("read")
        .replace("defaultIlluminationSet", "grp");
    std::fs::write(&scene_path, text).expect("rewrite");

    let err = SceneGraph::load_from_path(&scene_path).expect_err("duplicate names must fail");
    assert!(format!("{err:?}").contains("duplicate"));
}

#[test]
fn rename_to_a_taken_name_fails() {
    let mut graph = SceneGraph::new();
    let first = graph.create_group("left").expect("left");
    graph.create_group("right").expect("right");
    let err = graph.rename(first, "right").expect_err("collision");
    assert!(err.to_string().contains("taken"));
    // Renaming a node to its own name is a no-op, not a collision.
    graph.rename(first, "left").expect("self rename");
}

#[test]
fn reparent_rejects_cycles() {
    let mut graph = SceneGraph::new();
    let outer = graph.create_group("outer").expect("outer");
    let inner = graph.create_group("inner").expect("inner");
    graph.reparent(inner, outer).expect("parent inner under outer");
    let err = graph.reparent(outer, inner).expect_err("cycle");
    assert!(err.to_string().contains("descendant"));
    let err = graph.reparent(outer, outer).expect_err("self parent");
    assert!(err.to_string().contains("itself"));
}

#[test]
fn light_creation_wires_the_default_illumination_link() {
    let mut graph = SceneGraph::new();
    let shape = graph.create_light(LightType::Spot);
    assert_eq!(graph.kind(shape), NodeKind::Light(LightType::Spot));

    let transform = graph.parent(shape).expect("transform");
    assert_eq!(graph.kind(transform), NodeKind::Transform);

    let link = graph.downstream_connection(transform, OBJECT_SET_PORT).expect("link");
    assert_eq!(graph.name(link.to), "defaultIlluminationSet");

    assert!(graph.break_connection(transform, OBJECT_SET_PORT));
    assert!(graph.downstream_connection(transform, OBJECT_SET_PORT).is_none());
    assert!(!graph.break_connection(transform, OBJECT_SET_PORT));
}
