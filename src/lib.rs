pub mod models;
pub mod services;
pub mod ui;
pub mod views;

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Platform data directory holding the persisted search criteria and the
/// log file.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "repolens")
        .context("could not determine a data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
