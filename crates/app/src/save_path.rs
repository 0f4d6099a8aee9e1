//! Platform save-file location.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

pub fn default_save_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "maze-game")
        .context("no home directory to place the save file in")?;
    Ok(dirs.data_dir().join("savegame.json"))
}
