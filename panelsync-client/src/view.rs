use std::collections::BTreeMap;
use std::sync::Arc;

use panelsync_protocol::record::RecordId;
use parking_lot::Mutex;
use serde::Serialize;

use crate::render::RenderedRow;

/// The rendered list, shared between the dispatchers. Every write goes
/// through the mutex on the single logical writer path.
pub type SharedView<V> = Arc<Mutex<V>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SelectAllState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

/// Derived state of the selection-only controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectionControls {
    pub visible: bool,
    pub select_all: SelectAllState,
    pub bulk_action_enabled: bool,
}

/// Surface the controller renders into.
pub trait ListView: Send {
    /// Replaces the whole row set and clears any placeholder.
    fn replace_rows(&mut self, rows: Vec<RenderedRow>);
    /// Clears all rows and shows a single "no results" row.
    fn show_placeholder(&mut self, message: &str);
    fn append_row(&mut self, row: RenderedRow);
    /// Replaces the row with the same id. Returns `false` when absent.
    fn patch_row(&mut self, row: RenderedRow) -> bool;
    /// Removes matching rows and returns how many were removed.
    fn remove_rows(&mut self, ids: &[RecordId]) -> usize;
    fn set_counter(&mut self, name: &str, value: &str);
    fn set_selection_controls(&mut self, controls: SelectionControls);
    fn row_ids(&self) -> Vec<RecordId>;
}

/// In-memory list view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableView {
    rows: Vec<RenderedRow>,
    placeholder: Option<String>,
    counters: BTreeMap<String, String>,
    selection: SelectionControls,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedView<Self> {
        Arc::new(Mutex::new(self))
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn counter(&self, name: &str) -> Option<&str> {
        self.counters.get(name).map(String::as_str)
    }

    pub fn counters(&self) -> &BTreeMap<String, String> {
        &self.counters
    }

    pub fn find(&self, id: &RecordId) -> Option<&RenderedRow> {
        self.rows.iter().find(|row| &row.id == id)
    }

    pub fn selection(&self) -> SelectionControls {
        self.selection
    }
}

impl ListView for TableView {
    fn replace_rows(&mut self, rows: Vec<RenderedRow>) {
        self.placeholder = None;
        self.rows = rows;
    }

    fn show_placeholder(&mut self, message: &str) {
        self.rows.clear();
        self.placeholder = Some(message.to_string());
    }

    fn append_row(&mut self, row: RenderedRow) {
        self.placeholder = None;
        self.rows.push(row);
    }

    fn patch_row(&mut self, row: RenderedRow) -> bool {
        match self.rows.iter_mut().find(|existing| existing.id == row.id) {
            Some(existing) => {
                *existing = row;
                true
            }
            None => false,
        }
    }

    fn remove_rows(&mut self, ids: &[RecordId]) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !ids.contains(&row.id));
        before - self.rows.len()
    }

    fn set_counter(&mut self, name: &str, value: &str) {
        self.counters.insert(name.to_string(), value.to_string());
    }

    fn set_selection_controls(&mut self, controls: SelectionControls) {
        self.selection = controls;
    }

    fn row_ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|row| row.id.clone()).collect()
    }
}
