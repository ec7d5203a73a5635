//! Core shared library for the panelsync dashboard client.
//!
//! This crate exposes the primitives every other member depends on:
//! common errors, configuration loading, logging setup, CSRF cookie
//! lookup and the persisted UI preferences of the dashboard shell.

pub mod config;
pub mod cookies;
pub mod errors;
pub mod logging;
pub mod preferences;

pub use config::{ClientConfig, Environment};
pub use errors::{ConfigError, PanelSyncError, Result as CoreResult};
pub use preferences::{PreferenceStore, ACTIVE_SECTION_KEY, SIDEBAR_COLLAPSED_KEY};
