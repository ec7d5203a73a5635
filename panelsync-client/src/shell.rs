use panelsync_core::{CoreResult, PreferenceStore};
use serde::Serialize;
use tracing::debug;

/// Sections of the stock dashboard, in sidebar order.
pub const DASHBOARD_SECTIONS: &[&str] = &[
    "dashboard",
    "students-section",
    "employees-section",
    "finance-section",
    "activities-section",
];

pub const DEFAULT_SECTION: &str = "dashboard";

/// Which dashboard section is showing and whether the sidebar is collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellState {
    sections: Vec<String>,
    active_section: String,
    sidebar_collapsed: bool,
}

impl ShellState {
    /// Restores the last session. A saved section that is no longer offered
    /// falls back to `default_section`.
    pub fn restore(store: &PreferenceStore, sections: &[&str], default_section: &str) -> Self {
        let sections: Vec<String> = sections.iter().map(|s| s.to_string()).collect();
        let active_section = store
            .active_section()
            .filter(|saved| sections.iter().any(|known| known == saved))
            .unwrap_or(default_section)
            .to_string();
        Self {
            sections,
            active_section,
            sidebar_collapsed: store.sidebar_collapsed(),
        }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    /// Shows `section` and remembers it. Returns `false` for unknown ids.
    pub fn activate(&mut self, store: &mut PreferenceStore, section: &str) -> CoreResult<bool> {
        if !self.sections.iter().any(|known| known == section) {
            debug!(section, "ignoring unknown section");
            return Ok(false);
        }
        self.active_section = section.to_string();
        store.set_active_section(section);
        store.save()?;
        Ok(true)
    }

    /// Flips the sidebar and returns the new collapsed state.
    pub fn toggle_sidebar(&mut self, store: &mut PreferenceStore) -> CoreResult<bool> {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        store.set_sidebar_collapsed(self.sidebar_collapsed);
        store.save()?;
        Ok(self.sidebar_collapsed)
    }
}
