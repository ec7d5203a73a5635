//! Persisted UI preferences of the dashboard shell.
//!
//! Values are plain strings keyed by name, stored as a flat JSON object with
//! no schema version. A missing key always means "use the default".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PanelSyncError, Result};

/// Section id shown when the dashboard was last used.
pub const ACTIVE_SECTION_KEY: &str = "activeSection";
/// Stringified boolean, `"true"` when the sidebar is collapsed.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PreferenceData {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// File-backed key/value store for UI preferences.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    data: PreferenceData,
}

impl PreferenceStore {
    /// Loads the store from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_preferences_path()?,
        };

        let data = if path.exists() {
            let contents = fs::read(&path)?;
            if contents.is_empty() {
                PreferenceData::default()
            } else {
                serde_json::from_slice(&contents).map_err(|err| {
                    PanelSyncError::PreferencesError(format!(
                        "arquivo de preferências inválido: {err}"
                    ))
                })?
            }
        } else {
            PreferenceData::default()
        };

        debug!(path = %path.display(), keys = data.values.len(), "preferences loaded");
        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(&self.data)
            .map_err(|err| PanelSyncError::SerializationError(err.to_string()))?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.data.values.insert(key.to_string(), value.into());
        self.data.updated_at = Some(Utc::now());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.values.remove(key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.data.updated_at
    }

    pub fn active_section(&self) -> Option<&str> {
        self.get(ACTIVE_SECTION_KEY).filter(|value| !value.is_empty())
    }

    pub fn set_active_section(&mut self, section: &str) {
        self.set(ACTIVE_SECTION_KEY, section);
    }

    /// Anything other than the exact string `"true"` reads as expanded.
    pub fn sidebar_collapsed(&self) -> bool {
        self.get(SIDEBAR_COLLAPSED_KEY) == Some("true")
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.set(SIDEBAR_COLLAPSED_KEY, collapsed.to_string());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

fn default_preferences_path() -> Result<PathBuf> {
    let mut path = home_dir().ok_or_else(|| {
        PanelSyncError::PreferencesError("não foi possível determinar diretório home".into())
    })?;
    path.push(".panelsync");
    path.push("preferences.json");
    Ok(path)
}
