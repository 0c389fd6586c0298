// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based storage
//!
//! Layout under the base directory:
//! - `races.json` holds the race list
//! - `<kind>/<id>.json` holds per-race documents (manual times, cached results),
//!   with `<id>` percent-encoded

use crate::race::Race;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const RACES_FILE: &str = "races.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON file-based storage
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save a value to storage
    pub fn save<T: Serialize + ?Sized>(
        &self,
        kind: &str,
        id: &str,
        data: &T,
    ) -> Result<(), StorageError> {
        let dir = self.base_path.join(kind);
        fs::create_dir_all(&dir)?;
        write_json(&dir.join(file_name(id)), data)
    }

    /// Load a value from storage; `None` when it was never saved
    pub fn load<T: DeserializeOwned>(&self, kind: &str, id: &str) -> Result<Option<T>, StorageError> {
        read_json(&self.path_for(kind, id))
    }

    /// Delete a value from storage
    pub fn delete(&self, kind: &str, id: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(kind, id)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    pub fn path_for(&self, kind: &str, id: &str) -> PathBuf {
        self.base_path.join(kind).join(file_name(id))
    }

    /// Load the race list; empty when none was saved yet
    pub fn load_races(&self) -> Result<Vec<Race>, StorageError> {
        Ok(read_json(&self.base_path.join(RACES_FILE))?.unwrap_or_default())
    }

    /// Overwrite the race list
    pub fn save_races(&self, races: &[Race]) -> Result<(), StorageError> {
        write_json(&self.base_path.join(RACES_FILE), races)
    }
}

/// Map a race name to a file name.
///
/// Percent-encoding keeps distinct names distinct and leaves no path
/// separators in the stem.
fn file_name(id: &str) -> String {
    format!("{}.json", urlencoding::encode(id))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
