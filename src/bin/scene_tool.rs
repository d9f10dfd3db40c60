use anyhow::{anyhow, bail, Context, Result};
use lumenforge::light_creator::{self, LightRequest};
use lumenforge::naming::{self, FunctionTag, LightType, ROOT_GROUP_NAME};
use lumenforge::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use lumenforge::scene_graph::{NodeKind, SceneGraph};
use lumenforge::undo::UndoStack;
use std::env;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "validate" => {
            let scene_path = args
                .next()
                .ok_or_else(|| anyhow!("validate requires a path: scene_tool validate <scene>"))?;
            cmd_validate(&scene_path)
        }
        "list" => {
            let scene_path =
                args.next().ok_or_else(|| anyhow!("list requires a path: scene_tool list <scene>"))?;
            cmd_list(&scene_path)
        }
        "create" => {
            let scene_path = args
                .next()
                .ok_or_else(|| anyhow!("create requires a path: scene_tool create <scene> [flags]"))?;
            let options = CreateOptions::parse(args)?;
            cmd_create(&scene_path, options)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow!("unknown command '{other}'")),
    }
}

fn print_usage() {
    eprintln!(
        "Scene Tool

Usage:
  scene_tool validate <scene_path>       Check node names, hierarchy, and light convention
  scene_tool list <scene_path>           List nodes with kind and parent
  scene_tool create <scene_path> [flags] Create lights headlessly and save the scene
      --type <typeName>        pointLight | spotLight | areaLight | directionalLight |
                               irisAreaLight | irisSkyDomeLight   (default pointLight)
      --function <tag>         key | fil | rim | kck | bnc | spl  (default key)
      --basename <name>        basename override
      --count <n>              number of lights (default 1)
      --no-illuminate          sever the default illumination link
  scene_tool help                        Show this message
"
    );
}

struct CreateOptions {
    light_type: LightType,
    function: FunctionTag,
    basename: Option<String>,
    count: usize,
    illuminate: bool,
}

impl CreateOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = CreateOptions {
            light_type: LightType::Point,
            function: FunctionTag::Key,
            basename: None,
            count: 1,
            illuminate: true,
        };
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--type" => {
                    let value = args.next().ok_or_else(|| anyhow!("--type expects a value"))?;
                    options.light_type = LightType::from_type_name(&value)
                        .ok_or_else(|| anyhow!("unknown light type '{value}'"))?;
                }
                "--function" => {
                    let value = args.next().ok_or_else(|| anyhow!("--function expects a value"))?;
                    options.function = FunctionTag::from_tag(&value)
                        .ok_or_else(|| anyhow!("unknown function tag '{value}'"))?;
                }
                "--basename" => {
                    options.basename =
                        Some(args.next().ok_or_else(|| anyhow!("--basename expects a value"))?);
                }
                "--count" => {
                    let value = args.next().ok_or_else(|| anyhow!("--count expects a value"))?;
                    options.count =
                        value.parse().with_context(|| format!("invalid count '{value}'"))?;
                }
                "--no-illuminate" => options.illuminate = false,
                other => bail!("unknown flag '{other}'"),
            }
        }
        if options.count == 0 {
            bail!("--count must be at least 1");
        }
        Ok(options)
    }
}

fn load_scene(path: &str) -> Result<SceneGraph> {
    if Path::new(path).is_file() {
        SceneGraph::load_from_path(path)
    } else {
        Ok(SceneGraph::new())
    }
}

fn cmd_validate(scene_path: &str) -> Result<()> {
    let scene = SceneGraph::load_from_path(scene_path)?;
    let mut issues = Vec::new();

    if let Some(root) = scene.find(ROOT_GROUP_NAME) {
        if scene.kind(root) != NodeKind::Group {
            issues.push(format!("'{ROOT_GROUP_NAME}' is not a group"));
        }
        for &child in scene.children(root) {
            let name = scene.name(child);
            if !naming::matches_convention(name) {
                issues.push(format!("light '{name}' violates the naming convention"));
            }
        }
    }
    for (id, node) in scene.nodes() {
        if let Some(parent) = node.parent {
            if !scene.children(parent).contains(&id) {
                issues.push(format!("node '{}' is missing from its parent's child list", node.name));
            }
        }
    }

    if issues.is_empty() {
        println!("{scene_path}: OK ({} nodes)", scene.node_count());
        Ok(())
    } else {
        for issue in &issues {
            eprintln!("{scene_path}: {issue}");
        }
        bail!("{} issue(s) found", issues.len());
    }
}

fn cmd_list(scene_path: &str) -> Result<()> {
    let scene = SceneGraph::load_from_path(scene_path)?;
    for (id, node) in scene.nodes() {
        let parent = node.parent.map(|p| scene.name(p).to_string()).unwrap_or_else(|| "-".to_string());
        println!("{:>4}  {:<40} {:?}  parent: {parent}", id.index(), node.name, node.kind);
    }
    Ok(())
}

fn cmd_create(scene_path: &str, options: CreateOptions) -> Result<()> {
    let mut scene = load_scene(scene_path)?;
    let mut plugins = PluginRegistry::with_defaults();
    plugins.register_loaded(VENDOR_RENDER_PLUGIN);
    let mut undo = UndoStack::default();

    let request = LightRequest {
        light_type: options.light_type,
        function: options.function,
        use_selection: false,
        illuminate: options.illuminate,
        basename: options.basename,
    };
    let mut created = Vec::new();
    for _ in 0..options.count {
        created.extend(light_creator::create_lights(&mut scene, &plugins, &mut undo, &request)?);
    }
    scene.save_to_path(scene_path)?;
    for &id in &created {
        println!("{}", scene.name(id));
    }
    println!("created {} light(s) in {scene_path}", created.len());
    Ok(())
}
