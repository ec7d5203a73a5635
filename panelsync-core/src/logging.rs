//! Tracing setup for the `panelsync` command line.
//!
//! Table output goes to stdout, so diagnostics are written to stderr. The
//! filter comes from `PANELSYNC_LOG`, then `RUST_LOG`, and otherwise limits
//! the workspace crates to `level` while dependencies stay at `warn`.

use std::env;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::errors::{PanelSyncError, Result};

pub const LOG_ENV_VAR: &str = "PANELSYNC_LOG";

const WORKSPACE_TARGETS: [&str; 4] = [
    "panelsync",
    "panelsync_core",
    "panelsync_protocol",
    "panelsync_client",
];

pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|err| PanelSyncError::ConfigError(format!("{LOG_ENV_VAR}: {err}")))?,
        _ => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(level.unwrap_or("info")))),
    };

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| PanelSyncError::GeneralError(err.to_string()))?;

    Ok(())
}

fn default_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for target in WORKSPACE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}
