// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection for live watchers

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Something a watcher can poll for modification.
///
/// `FileSource` stats the punch file; other implementations can stand in for
/// platform notification mechanisms or tests.
pub trait ChangeSource: Send + 'static {
    /// Current modification time
    fn modified(&self) -> io::Result<SystemTime>;

    /// Human-readable location for diagnostics
    fn location(&self) -> String;
}

/// Polls a file's modification time
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangeSource for FileSource {
    fn modified(&self) -> io::Result<SystemTime> {
        std::fs::metadata(&self.path)?.modified()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
