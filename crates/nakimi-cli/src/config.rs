//! Locating and loading the planner configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use nakimi_lib::PlannerConfig;

/// File name of the planner configuration inside the config directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Platform config location, e.g. `~/.config/nakimi/config.json` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("cl", "nakimi", "nakimi").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load the planner configuration.
///
/// An explicit path must exist. Without one, the platform default is used
/// when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<PlannerConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => read_config(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(PlannerConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<PlannerConfig> {
    let config = PlannerConfig::from_path(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded planner config");
    Ok(config)
}
