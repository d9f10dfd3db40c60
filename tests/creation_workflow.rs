use lumenforge::light_creator::{create_lights, LightRequest};
use lumenforge::naming::{self, FunctionTag, LightType, MAX_NAME_INDEX};
use lumenforge::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use lumenforge::scene_graph::SceneGraph;
use lumenforge::undo::UndoStack;

fn loaded_plugins() -> PluginRegistry {
    let mut plugins = PluginRegistry::with_defaults();
    plugins.register_loaded(VENDOR_RENDER_PLUGIN);
    plugins
}

#[test]
fn a_batch_is_one_undoable_unit() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();
    let a = graph.create_group("a_x").expect("a_x");
    let b = graph.create_group("b_y").expect("b_y");
    graph.select(vec![a, b]);
    let before = graph.clone();

    let mut point = LightRequest::new(LightType::Point);
    point.use_selection = true;
    create_lights(&mut graph, &plugins, &mut undo, &point).expect("create");
    let after = graph.clone();
    assert_ne!(before, after);

    assert!(undo.undo(&mut graph).is_some());
    assert_eq!(graph, before);
    assert!(undo.redo(&mut graph).is_some());
    assert_eq!(graph, after);
}

#[test]
fn exhausted_name_space_fails_and_stays_undoable() {
    let mut graph = SceneGraph::new();
    for index in 1..=MAX_NAME_INDEX {
        let name = naming::compose("foo", FunctionTag::Key, index, LightType::Point);
        graph.create_group(&name).expect("seed name");
    }
    let before = graph.clone();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();

    let mut point = LightRequest::new(LightType::Point);
    point.basename = Some("foo".to_string());
    let err = create_lights(&mut graph, &plugins, &mut undo, &point).expect_err("exhausted");
    assert!(err.to_string().contains("exhausted"));

    // The aborted batch left the auto-named light behind, reversible as one unit.
    assert!(undo.can_undo());
    undo.undo(&mut graph);
    assert_eq!(graph, before);
}

#[test]
fn undo_restores_prior_selection() {
    let mut graph = SceneGraph::new();
    let mut undo = UndoStack::default();
    let plugins = loaded_plugins();
    let anchor = graph.create_group("anchor_grp").expect("anchor");
    graph.select(vec![anchor]);

    create_lights(&mut graph, &plugins, &mut undo, &LightRequest::new(LightType::Spot))
        .expect("create");
    assert_ne!(graph.selection(), &[anchor]);

    undo.undo(&mut graph).expect("undo");
    assert_eq!(graph.selection(), &[anchor]);
}
