//! Versioned JSON save files with atomic replacement.
//!
//! The session is serialized field by field rather than dumped as raw
//! struct bytes, so saves survive layout, padding, and endianness changes.
//! Writes go to a temp file first and are renamed into place; a crash
//! mid-save leaves the previous file intact.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::LevelSession;
use crate::sim::SaveStore;

pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct SaveFile {
    format_version: u32,
    session: LevelSession,
}

pub struct JsonSaveStore {
    path: PathBuf,
}

impl JsonSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveStore for JsonSaveStore {
    fn save(&mut self, session: &LevelSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = SaveFile { format_version: SAVE_FORMAT_VERSION, session: session.clone() };
        let json = serde_json::to_string_pretty(&file).map_err(io::Error::other)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn load(&mut self) -> io::Result<Option<LevelSession>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error),
        };

        let file: SaveFile = serde_json::from_str(&content)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        if file.format_version != SAVE_FORMAT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported save format version {}", file.format_version),
            ));
        }
        Ok(Some(file.session))
    }
}
