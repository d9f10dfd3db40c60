use crate::config::PanelLayout;
use crate::light_creator::LightRequest;
use crate::naming::{FunctionTag, LightType};
use crate::settings::PanelPlacement;
use egui::Ui;

/// The five kinds exposed as trigger buttons. Area lights without a vendor
/// prefix stay reachable through the service and the scene tool.
const BUTTON_TYPES: [LightType; 5] = [
    LightType::Spot,
    LightType::Directional,
    LightType::Point,
    LightType::IrisArea,
    LightType::IrisSkyDome,
];

#[derive(Clone, Debug)]
pub enum LightPanelCommand {
    CreateLight(LightRequest),
    Undo,
    Redo,
    LayoutSwitched(PanelLayout),
}

/// Snapshot of editor state passed into the panel each frame.
pub struct LightPanelState<'a> {
    pub selection: &'a [String],
    pub vendor_plugin_loaded: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub recent_events: &'a [String],
}

pub struct LightCreatorPanel {
    open: bool,
    illuminate: bool,
    use_selection: bool,
    basename: String,
    function: FunctionTag,
    layout: PanelLayout,
    status: Option<String>,
    pending_commands: Vec<LightPanelCommand>,
}

impl LightCreatorPanel {
    pub fn new(layout: PanelLayout, open: bool) -> Self {
        Self {
            open,
            illuminate: true,
            use_selection: false,
            basename: String::new(),
            function: FunctionTag::default(),
            layout,
            status: None,
            pending_commands: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn layout(&self) -> PanelLayout {
        self.layout
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn drain_commands(&mut self) -> Vec<LightPanelCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    fn request_for(&self, light_type: LightType) -> LightRequest {
        let basename = self.basename.trim();
        LightRequest {
            light_type,
            function: self.function,
            use_selection: self.use_selection,
            illuminate: self.illuminate,
            basename: if basename.is_empty() { None } else { Some(basename.to_string()) },
        }
    }

    pub fn render_window(
        &mut self,
        ctx: &egui::Context,
        placement: &mut PanelPlacement,
        state: &LightPanelState<'_>,
    ) {
        let mut open = self.open;
        let window = egui::Window::new("Light Creator")
            .open(&mut open)
            .default_pos(egui::pos2(placement.x, placement.y))
            .default_size(egui::vec2(placement.width, placement.height))
            .resizable(true)
            .show(ctx, |ui| {
                self.render_contents(ui, state);
            });
        self.open = open;
        if let Some(window_response) = window {
            let frame = window_response.response;
            let rect = frame.rect;
            placement.x = rect.min.x;
            placement.y = rect.min.y;
            placement.width = rect.width();
            placement.height = rect.height();
            frame.context_menu(|menu| {
                for layout in [PanelLayout::Grid, PanelLayout::Horizontal, PanelLayout::Vertical] {
                    let label = format!("Switch to {} Layout", layout.label());
                    if menu.button(label).clicked() {
                        self.layout = layout;
                        self.pending_commands.push(LightPanelCommand::LayoutSwitched(layout));
                        menu.close();
                    }
                }
            });
        }
        placement.open = self.open;
        placement.layout = self.layout;
    }

    fn render_contents(&mut self, ui: &mut Ui, state: &LightPanelState<'_>) {
        match self.layout {
            PanelLayout::Vertical => {
                self.render_toggles(ui, state);
                self.render_name_fields(ui);
                for light_type in BUTTON_TYPES {
                    self.render_type_button(ui, light_type, state);
                }
            }
            PanelLayout::Horizontal => {
                ui.horizontal_wrapped(|ui| {
                    self.render_toggles(ui, state);
                    self.render_name_fields(ui);
                    for light_type in BUTTON_TYPES {
                        self.render_type_button(ui, light_type, state);
                    }
                });
            }
            PanelLayout::Grid => {
                egui::Grid::new("light_creator_grid").num_columns(3).show(ui, |ui| {
                    self.render_illuminate_toggle(ui);
                    self.render_name_fields(ui);
                    ui.end_row();
                    self.render_selection_toggle(ui, state);
                    self.render_type_button(ui, BUTTON_TYPES[0], state);
                    self.render_type_button(ui, BUTTON_TYPES[1], state);
                    ui.end_row();
                    self.render_type_button(ui, BUTTON_TYPES[2], state);
                    self.render_type_button(ui, BUTTON_TYPES[3], state);
                    self.render_type_button(ui, BUTTON_TYPES[4], state);
                    ui.end_row();
                });
            }
        }
        ui.separator();
        ui.horizontal(|ui| {
            if ui.add_enabled(state.can_undo, egui::Button::new("Undo")).clicked() {
                self.pending_commands.push(LightPanelCommand::Undo);
            }
            if ui.add_enabled(state.can_redo, egui::Button::new("Redo")).clicked() {
                self.pending_commands.push(LightPanelCommand::Redo);
            }
            ui.label(format!("{} selected", state.selection.len()));
        });
        if let Some(status) = &self.status {
            ui.small(status);
        }
        if !state.recent_events.is_empty() {
            egui::CollapsingHeader::new("Recent").default_open(false).show(ui, |ui| {
                for event in state.recent_events.iter().rev() {
                    ui.label(event);
                }
            });
        }
    }

    fn render_toggles(&mut self, ui: &mut Ui, state: &LightPanelState<'_>) {
        self.render_illuminate_toggle(ui);
        self.render_selection_toggle(ui, state);
    }

    fn render_illuminate_toggle(&mut self, ui: &mut Ui) {
        ui.toggle_value(&mut self.illuminate, "Illuminate")
            .on_hover_text("New lights keep their default illumination link");
    }

    fn render_selection_toggle(&mut self, ui: &mut Ui, state: &LightPanelState<'_>) {
        let label = format!("Use Selection ({})", state.selection.len());
        ui.toggle_value(&mut self.use_selection, label)
            .on_hover_text("One light per selected node, basename taken from each node");
    }

    fn render_name_fields(&mut self, ui: &mut Ui) {
        // Selection-driven naming overrides the typed basename.
        ui.add_enabled(
            !self.use_selection,
            egui::TextEdit::singleline(&mut self.basename).hint_text("Basename"),
        );
        egui::ComboBox::from_id_salt("light_function")
            .selected_text(self.function.label())
            .show_ui(ui, |ui| {
                for function in FunctionTag::ALL {
                    ui.selectable_value(&mut self.function, function, function.label());
                }
            });
    }

    fn render_type_button(&mut self, ui: &mut Ui, light_type: LightType, state: &LightPanelState<'_>) {
        let mut response = ui.button(light_type.label()).on_hover_text(light_type.type_name());
        if light_type.is_vendor() && !state.vendor_plugin_loaded {
            response = response.on_hover_text("Requires the iris render plugin");
        }
        if response.clicked() {
            self.pending_commands.push(LightPanelCommand::CreateLight(self.request_for(light_type)));
        }
    }
}
