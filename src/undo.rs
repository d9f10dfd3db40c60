use crate::scene_graph::SceneGraph;

const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone)]
struct HistoryEntry {
    label: String,
    graph: SceneGraph,
}

/// Whole-document history. Each entry is the scene as it looked before one
/// user-facing operation ran.
#[derive(Debug)]
pub struct UndoStack {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl UndoStack {
    pub fn new(limit: usize) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), limit: limit.max(1) }
    }

    /// Opens a transaction. The returned scope commits the pre-state onto the
    /// undo stack when it goes out of scope, on every exit path; mutations
    /// made after an error are therefore still reversible as one unit.
    pub fn begin<'a>(&'a mut self, graph: &SceneGraph, label: impl Into<String>) -> UndoScope<'a> {
        UndoScope {
            stack: self,
            pending: Some(HistoryEntry { label: label.into(), graph: graph.clone() }),
        }
    }

    fn commit(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.undo.push(entry);
        if self.undo.len() > self.limit {
            let overflow = self.undo.len() - self.limit;
            self.undo.drain(..overflow);
        }
    }

    /// Restores the most recent pre-state. Returns the operation label.
    pub fn undo(&mut self, graph: &mut SceneGraph) -> Option<String> {
        let entry = self.undo.pop()?;
        self.redo.push(HistoryEntry { label: entry.label.clone(), graph: graph.clone() });
        *graph = entry.graph;
        Some(entry.label)
    }

    pub fn redo(&mut self, graph: &mut SceneGraph) -> Option<String> {
        let entry = self.redo.pop()?;
        self.undo.push(HistoryEntry { label: entry.label.clone(), graph: graph.clone() });
        *graph = entry.graph;
        Some(entry.label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.undo.last().map(|entry| entry.label.as_str())
    }

    pub fn depth(&self) -> usize {
        self.undo.len()
    }
}

/// Scoped transaction over the scene document. Dropping the scope commits; a
/// scope abandoned with [`UndoScope::cancel`] leaves no history entry.
pub struct UndoScope<'a> {
    stack: &'a mut UndoStack,
    pending: Option<HistoryEntry>,
}

impl UndoScope<'_> {
    /// Discards the pending entry; used when an operation turned out to be a
    /// no-op and should not pollute the history.
    pub fn cancel(mut self) {
        self.pending = None;
    }
}

impl Drop for UndoScope<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.pending.take() {
            self.stack.commit(entry);
        }
    }
}
