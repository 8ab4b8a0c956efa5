//! Default locations for the tasks CLI.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "tasks.toml";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "ydun", "offline-tasks").context("Could not determine home directory")
}

/// Get the default data directory for the tasks CLI.
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Get the default configuration file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}
