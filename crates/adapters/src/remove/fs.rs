// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real filesystem remover

use super::EntryRemover;
use std::io;
use std::path::Path;

/// Removes entries from the real filesystem
///
/// Symlinks are removed themselves, never followed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsRemover;

impl FsRemover {
    pub fn new() -> Self {
        Self
    }
}

impl EntryRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };

        match result {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
