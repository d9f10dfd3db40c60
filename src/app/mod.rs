use crate::config::{AppConfig, AppConfigOverrides};
use crate::events::{EventBus, ToolEvent};
use crate::light_creator::{self, LightRequest};
use crate::naming;
use crate::plugins::{PluginRegistry, VENDOR_RENDER_PLUGIN};
use crate::renderer::Renderer;
use crate::scene_graph::SceneGraph;
use crate::settings::SettingsStore;
use crate::undo::UndoStack;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};

use egui::Context as EguiCtx;
use egui_wgpu::{Renderer as EguiRenderer, RendererOptions, ScreenDescriptor};
use egui_winit::State as EguiWinit;

mod light_panel;
mod panel_registry;
mod shelf;

pub use light_panel::{LightCreatorPanel, LightPanelCommand, LightPanelState};
pub use panel_registry::{PanelEntry, PanelRegistry, LIGHT_PANEL_ID};
pub use shelf::{register_light_creator, ShelfAction, ShelfEntry, ToolShelf};

pub async fn run() -> Result<()> {
    run_with_overrides(AppConfigOverrides::default()).await
}

pub async fn run_with_overrides(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default("config/app.json");
    config.apply_overrides(&overrides);
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    renderer: Renderer,
    config: AppConfig,
    scene: SceneGraph,
    scene_path: PathBuf,
    undo: UndoStack,
    plugins: PluginRegistry,
    settings: SettingsStore,
    panels: PanelRegistry,
    shelf: ToolShelf,
    events: EventBus,
    recent_events: VecDeque<String>,
    pending_shelf_actions: Vec<ShelfAction>,
    should_close: bool,
    ui_scale: f32,

    // egui
    egui_ctx: EguiCtx,
    egui_winit: Option<EguiWinit>,
    egui_renderer: Option<EguiRenderer>,
    egui_screen: Option<ScreenDescriptor>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        naming::validate_suffix_table()?;
        let renderer = Renderer::new(&config.window);
        let settings = SettingsStore::new(config.editor.settings_dir.as_str());
        let mut events = EventBus::default();

        let scene_path = PathBuf::from(&config.scene.path);
        let scene = if scene_path.is_file() {
            match SceneGraph::load_from_path(&scene_path) {
                Ok(scene) => {
                    events.push(ToolEvent::SceneLoaded { path: scene_path.display().to_string() });
                    scene
                }
                Err(err) => {
                    log::warn!("scene load failed, starting empty: {err:?}");
                    SceneGraph::new()
                }
            }
        } else {
            SceneGraph::new()
        };

        let mut plugins = PluginRegistry::with_defaults();
        for name in &config.plugins.load {
            plugins.register_loaded(name);
        }

        let mut shelf = ToolShelf::new();
        if let Err(err) = register_light_creator(&mut shelf, Path::new(&config.editor.resources_dir)) {
            log::warn!("light creator shelf registration failed: {err:?}");
        }

        let mut panels = PanelRegistry::new();
        panels.create(LIGHT_PANEL_ID, &settings, config.editor.preferred_layout)?;

        let ui_scale = config.editor.ui_scale;
        Ok(Self {
            renderer,
            config,
            scene,
            scene_path,
            undo: UndoStack::default(),
            plugins,
            settings,
            panels,
            shelf,
            events,
            recent_events: VecDeque::new(),
            pending_shelf_actions: Vec::new(),
            should_close: false,
            ui_scale,
            egui_ctx: EguiCtx::default(),
            egui_winit: None,
            egui_renderer: None,
            egui_screen: None,
        })
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    fn shutdown(&mut self) {
        self.panels.persist_all(&self.settings);
        if self.config.scene.save_on_exit {
            match self.scene.save_to_path(&self.scene_path) {
                Ok(()) => log::info!("scene saved to {}", self.scene_path.display()),
                Err(err) => log::error!("scene save failed: {err:?}"),
            }
        }
        self.should_close = true;
    }

    fn render_ui(&mut self, ctx: &EguiCtx, state: &LightPanelState<'_>) {
        self.render_shelf(ctx);
        for (_, entry) in self.panels.iter_mut() {
            let PanelEntry { panel, placement } = entry;
            if panel.is_open() {
                panel.render_window(ctx, placement, state);
            }
        }
    }

    fn render_shelf(&mut self, ctx: &EguiCtx) {
        if self.shelf.entries().is_empty() {
            return;
        }
        let mut clicked = Vec::new();
        egui::TopBottomPanel::top("lumenforge_shelf").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for entry in self.shelf.entries() {
                    let response =
                        ui.button(&entry.label).on_hover_text(entry.icon.display().to_string());
                    if response.clicked() {
                        clicked.push(entry.action.clone());
                    }
                }
            });
        });
        self.pending_shelf_actions.extend(clicked);
    }

    fn apply_shelf_actions(&mut self) {
        let actions = std::mem::take(&mut self.pending_shelf_actions);
        for action in actions {
            match action {
                ShelfAction::OpenPanel { panel_id } => {
                    if let Some(entry) = self.panels.get_mut(&panel_id) {
                        entry.panel.set_open(true);
                        entry.placement.open = true;
                    } else {
                        log::warn!("shelf launcher targets unknown panel '{panel_id}'");
                    }
                }
            }
        }
    }

    fn apply_panel_commands(&mut self) {
        let mut commands = Vec::new();
        for (id, entry) in self.panels.iter_mut() {
            for command in entry.panel.drain_commands() {
                commands.push((id.clone(), command));
            }
        }
        for (panel_id, command) in commands {
            let status = self.apply_panel_command(command);
            if let (Some(entry), Some(status)) = (self.panels.get_mut(&panel_id), status) {
                entry.panel.set_status(status);
            }
        }
    }

    fn apply_panel_command(&mut self, command: LightPanelCommand) -> Option<String> {
        match command {
            LightPanelCommand::CreateLight(request) => Some(self.create_lights(&request)),
            LightPanelCommand::Undo => {
                let label = self.undo.undo(&mut self.scene)?;
                self.events.push(ToolEvent::UndoApplied { label: label.clone() });
                Some(format!("Undid '{label}'"))
            }
            LightPanelCommand::Redo => {
                let label = self.undo.redo(&mut self.scene)?;
                self.events.push(ToolEvent::RedoApplied { label: label.clone() });
                Some(format!("Redid '{label}'"))
            }
            LightPanelCommand::LayoutSwitched(_) => {
                self.panels.persist_all(&self.settings);
                None
            }
        }
    }

    fn create_lights(&mut self, request: &LightRequest) -> String {
        match light_creator::create_lights(&mut self.scene, &self.plugins, &mut self.undo, request) {
            Ok(created) if created.is_empty() => {
                self.events.push(ToolEvent::CreationSkipped {
                    reason: "preconditions not met".to_string(),
                });
                "No lights created (see log)".to_string()
            }
            Ok(created) => {
                let names: Vec<String> =
                    created.iter().map(|&id| self.scene.name(id).to_string()).collect();
                let status = format!("Created {}", names.join(", "));
                self.events.push(ToolEvent::LightsCreated { count: created.len(), names });
                status
            }
            Err(err) => {
                log::error!("light creation failed: {err:?}");
                self.events.push(ToolEvent::CreationSkipped { reason: err.to_string() });
                format!("Creation failed: {err}")
            }
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.drain() {
            self.recent_events.push_back(event.to_string());
        }
        while self.recent_events.len() > self.config.editor.event_log_limit {
            self.recent_events.pop_front();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.renderer.ensure_window(event_loop) {
            eprintln!("Renderer initialization error: {err:?}");
            self.should_close = true;
            return;
        }

        if self.egui_winit.is_none() {
            if let Some(window) = self.renderer.window() {
                let state = EguiWinit::new(
                    self.egui_ctx.clone(),
                    egui::ViewportId::ROOT,
                    window,
                    Some(self.renderer.pixels_per_point()),
                    window.theme(),
                    None,
                );
                self.egui_winit = Some(state);
            }
        }

        // egui painter
        let egui_renderer = match (self.renderer.device(), self.renderer.surface_format()) {
            (Ok(device), Ok(format)) => EguiRenderer::new(device, format, RendererOptions::default()),
            (Err(err), _) | (_, Err(err)) => {
                eprintln!("Unable to initialize egui renderer: {err:?}");
                self.should_close = true;
                return;
            }
        };
        self.egui_renderer = Some(egui_renderer);
        let size = self.renderer.size();
        self.egui_screen = Some(ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.renderer.pixels_per_point() * self.ui_scale,
        });
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, id: winit::window::WindowId, event: WindowEvent) {
        let mut consumed = false;
        if let (Some(window), Some(state)) = (self.renderer.window(), self.egui_winit.as_mut()) {
            if id == window.id() {
                let resp = state.on_window_event(window, &event);
                if resp.consumed {
                    consumed = true;
                }
            }
        }
        if consumed {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(),
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
                if let Some(sd) = &mut self.egui_screen {
                    sd.size_in_pixels = [size.width, size.height];
                    sd.pixels_per_point = self.renderer.pixels_per_point() * self.ui_scale;
                }
            }
            WindowEvent::KeyboardInput { event: KeyEvent { logical_key, state, .. }, .. } => {
                if let Key::Named(NamedKey::Escape) = logical_key {
                    if *state == ElementState::Pressed {
                        self.shutdown();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }
        if self.egui_winit.is_none() {
            return;
        }

        let raw_input = {
            let Some(window) = self.renderer.window() else {
                return;
            };
            self.egui_winit.as_mut().unwrap().take_egui_input(window)
        };
        let base_pixels_per_point = self.renderer.pixels_per_point();
        self.egui_ctx.set_pixels_per_point(base_pixels_per_point * self.ui_scale);
        if let Some(screen) = self.egui_screen.as_mut() {
            screen.pixels_per_point = self.egui_ctx.pixels_per_point();
        }

        let selection_names = self.scene.selected_names();
        let recent_events: Vec<String> = self.recent_events.iter().cloned().collect();
        let panel_state = LightPanelState {
            selection: &selection_names,
            vendor_plugin_loaded: self.plugins.is_loaded(VENDOR_RENDER_PLUGIN),
            can_undo: self.undo.can_undo(),
            can_redo: self.undo.can_redo(),
            recent_events: &recent_events,
        };

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            self.render_ui(ctx, &panel_state);
        });

        self.apply_shelf_actions();
        self.apply_panel_commands();
        self.drain_events();

        let egui::FullOutput { platform_output, textures_delta, shapes, .. } = full_output;
        if let Some(window) = self.renderer.window() {
            self.egui_winit.as_mut().unwrap().handle_platform_output(window, platform_output);
        } else {
            return;
        }

        if let (Some(ren), Some(screen)) = (self.egui_renderer.as_mut(), self.egui_screen.as_ref()) {
            if let (Ok(device), Ok(queue)) = (self.renderer.device(), self.renderer.queue()) {
                for (id, delta) in &textures_delta.set {
                    ren.update_texture(device, queue, *id, delta);
                }
            }
            let meshes = self.egui_ctx.tessellate(shapes, screen.pixels_per_point);
            if let Err(err) = self.renderer.render_egui(ren, &meshes, screen) {
                eprintln!("Egui render error: {err:?}");
            }
            for id in &textures_delta.free {
                ren.free_texture(id);
            }
        }

        if let Some(w) = self.renderer.window() {
            w.request_redraw();
        }
    }
}
