use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::Event;
use crate::utils;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Keyed event store: one JSON file mapping id → event, plus the
/// immediately-prior version kept as a fallback copy. One read at the
/// start of a run, one write at the end.
pub struct EventStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_path: backup_path.into(),
        }
    }

    /// Loads the store, falling back to the backup copy on a corrupt or
    /// unreadable file, and to an empty store after that. Never fails
    /// the run.
    pub fn load(&self) -> BTreeMap<String, Event> {
        if !self.path.exists() {
            return BTreeMap::new();
        }
        match read_map(&self.path) {
            Ok(events) => events,
            Err(err) => {
                warn!("store {:?} unreadable: {err}", self.path);
                match read_map(&self.backup_path) {
                    Ok(events) => {
                        info!("recovered {} events from backup copy", events.len());
                        events
                    }
                    Err(backup_err) => {
                        warn!(
                            "backup {:?} unusable, starting empty: {backup_err}",
                            self.backup_path
                        );
                        BTreeMap::new()
                    }
                }
            }
        }
    }

    /// Writes the store for the next cycle. The previous file is copied
    /// aside first, then the new contents land under a temporary name
    /// and are renamed into place, so a crash mid-write leaves the prior
    /// cycle's data intact.
    pub fn save(&self, events: &BTreeMap<String, Event>) -> Result<(), StoreError> {
        utils::ensure_parent(&self.path);
        if self.path.exists() {
            if let Err(err) = fs::copy(&self.path, &self.backup_path) {
                warn!("could not refresh backup {:?}: {err}", self.backup_path);
            }
        }
        let contents = serde_json::to_string_pretty(events)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn read_map(path: &Path) -> Result<BTreeMap<String, Event>, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
