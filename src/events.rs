use std::fmt;

#[derive(Debug, Clone)]
pub enum ToolEvent {
    LightsCreated { count: usize, names: Vec<String> },
    CreationSkipped { reason: String },
    UndoApplied { label: String },
    RedoApplied { label: String },
    SceneSaved { path: String },
    SceneLoaded { path: String },
}

impl fmt::Display for ToolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolEvent::LightsCreated { count, names } => {
                write!(f, "Created {count} light(s): {}", names.join(", "))
            }
            ToolEvent::CreationSkipped { reason } => write!(f, "Skipped: {reason}"),
            ToolEvent::UndoApplied { label } => write!(f, "Undid '{label}'"),
            ToolEvent::RedoApplied { label } => write!(f, "Redid '{label}'"),
            ToolEvent::SceneSaved { path } => write!(f, "Scene saved to {path}"),
            ToolEvent::SceneLoaded { path } => write!(f, "Scene loaded from {path}"),
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    events: Vec<ToolEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: ToolEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<ToolEvent> {
        self.events.drain(..).collect()
    }
}
