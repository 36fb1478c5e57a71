//! Completion-flag persistence.
//!
//! A finished run leaves a small JSON record on disk so later sessions can
//! show the completion badge. Failures here are logged and ignored; losing
//! the badge must never take down the game.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GameResult, PersistenceError};

/// Environment variable overriding the record location. Used by tests and
/// useful for sandboxed installs.
pub const SAVE_PATH_ENV: &str = "CAMPUS_RUN_SAVE";

const SAVE_FILE_NAME: &str = ".campus-run.json";

/// Whether (and when) a run has ever been completed on this machine.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub completed: bool,
    /// Unix timestamp of the first completed run, if any.
    pub completed_at: Option<u64>,
}

impl CompletionRecord {
    /// Marks the record complete, keeping the original completion time if
    /// one is already set.
    pub fn mark_completed(&mut self) {
        self.completed = true;
        if self.completed_at.is_none() {
            self.completed_at = SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs());
        }
    }
}

/// Where the completion record lives on disk.
#[derive(Resource, Debug, Clone)]
pub struct SaveLocation(pub PathBuf);

impl SaveLocation {
    /// Resolves the save path from `CAMPUS_RUN_SAVE`, falling back to the
    /// user's home directory.
    pub fn from_env() -> GameResult<Self> {
        if let Ok(path) = std::env::var(SAVE_PATH_ENV) {
            return Ok(Self(PathBuf::from(path)));
        }
        let home = std::env::var_os("HOME").ok_or(PersistenceError::NoSavePath)?;
        Ok(Self(PathBuf::from(home).join(SAVE_FILE_NAME)))
    }
}

/// Loads the record from `path`. A missing file is a fresh install; any
/// other failure is logged and treated the same way.
pub fn load(path: &Path) -> CompletionRecord {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(record) => {
                debug!(?path, ?record, "Loaded completion record");
                record
            }
            Err(e) => {
                warn!(?path, error = %e, "Completion record is malformed, ignoring it");
                CompletionRecord::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CompletionRecord::default(),
        Err(e) => {
            warn!(?path, error = %e, "Could not read completion record");
            CompletionRecord::default()
        }
    }
}

/// Writes the record to `path`, creating parent directories as needed.
pub fn save(path: &Path, record: &CompletionRecord) -> GameResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(PersistenceError::Io)?;
        }
    }
    let contents = serde_json::to_string_pretty(record).map_err(PersistenceError::Malformed)?;
    std::fs::write(path, contents).map_err(PersistenceError::Io)?;
    debug!(?path, "Wrote completion record");
    Ok(())
}
