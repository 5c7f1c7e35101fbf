use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::criteria::SearchCriteria;

const CRITERIA_FILE: &str = "last_search.json";

/// Single-slot persistence for the last search criteria, shared by the
/// search and commits views. Backed by one JSON file in the app data
/// directory; tests point it at a temp directory instead.
pub struct CriteriaStore {
    path: PathBuf,
}

impl CriteriaStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CRITERIA_FILE),
        }
    }

    /// Reads the stored criteria. A missing or unreadable file counts as
    /// empty rather than an error.
    pub fn load(&self) -> Option<SearchCriteria> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(criteria) => Some(criteria),
            Err(e) => {
                warn!("ignoring unreadable criteria file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, criteria: &SearchCriteria) -> Result<()> {
        let json = serde_json::to_string_pretty(criteria)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}
