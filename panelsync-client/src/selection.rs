use std::collections::BTreeMap;

use panelsync_protocol::record::RecordId;
use tracing::debug;

use crate::view::{SelectAllState, SelectionControls};

/// Per-row checkbox state of one table.
///
/// The per-row map is the only stored state; the select-all control and the
/// bulk-action button are always derived from it.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    active: bool,
    rows: BTreeMap<RecordId, bool>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Aligns the tracked rows with the rendered ones. Surviving rows keep
    /// their state, new rows start unchecked, vanished rows are dropped.
    pub fn sync_rows(&mut self, ids: &[RecordId]) {
        let mut next = BTreeMap::new();
        for id in ids {
            let checked = self.rows.get(id).copied().unwrap_or(false);
            next.insert(id.clone(), checked);
        }
        self.rows = next;
    }

    /// Flips selection mode. Leaving the mode clears every checkbox.
    pub fn toggle_selection_mode(&mut self) -> bool {
        self.active = !self.active;
        if !self.active {
            self.clear();
        }
        debug!(active = self.active, "selection mode toggled");
        self.active
    }

    /// Flips one row. Returns the new state, or `None` when selection mode
    /// is off or the row is not rendered.
    pub fn toggle_row(&mut self, id: &RecordId) -> Option<bool> {
        if !self.active {
            return None;
        }
        let checked = self.rows.get_mut(id)?;
        *checked = !*checked;
        Some(*checked)
    }

    pub fn toggle_all(&mut self, checked: bool) {
        if !self.active {
            return;
        }
        for state in self.rows.values_mut() {
            *state = checked;
        }
    }

    pub fn clear(&mut self) {
        for state in self.rows.values_mut() {
            *state = false;
        }
    }

    /// Forgets rows that no longer exist.
    pub fn forget(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.rows.remove(id);
        }
    }

    pub fn is_any_selected(&self) -> bool {
        self.rows.values().any(|checked| *checked)
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.rows
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let checked = self.rows.values().filter(|checked| **checked).count();
        if checked == 0 {
            SelectAllState::Unchecked
        } else if checked == self.rows.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }

    pub fn controls(&self) -> SelectionControls {
        SelectionControls {
            visible: self.active,
            select_all: self.select_all_state(),
            bulk_action_enabled: self.is_any_selected(),
        }
    }
}
