//! Persisted key/value player state (`state.toml`).
//!
//! Holds the few values that survive a restart: music directory, volume and
//! the last played track. Every `set` writes the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::StoreError;

pub const MUSIC_DIRECTORY: &str = "music_directory";
pub const VOLUME: &str = "volume";
pub const LAST_PLAYED: &str = "last_played";

#[derive(Debug, Default)]
pub struct StateStore {
    path: Option<PathBuf>,
    values: toml::Table,
}

impl StateStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// one is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_table(&path) {
            Ok(Some(t)) => {
                debug!("state loaded from {}", path.display());
                t
            }
            Ok(None) => {
                debug!("no state file at {}, starting empty", path.display());
                toml::Table::new()
            }
            Err(e) => {
                warn!("ignoring state file {}: {e}", path.display());
                toml::Table::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Value stored under `key`, or `default` when absent or of the wrong type.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            Some(v) => v.clone().try_into().unwrap_or_else(|e| {
                warn!("state key {key} has an unexpected value: {e}");
                default
            }),
            None => default,
        }
    }

    /// Store `value` under `key` and write the file.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        let value = toml::Value::try_from(value)?;
        self.values.insert(key.to_string(), value);
        self.save()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(&self.values)?;
        // Write then rename so a crash never leaves a half-written file.
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, path)?;
        debug!("state saved to {}", path.display());
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}
