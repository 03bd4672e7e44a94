// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result of one clearing pass

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Aggregate outcome of clearing a directory
///
/// `failed` is always a subset of `attempted`. A pass whose directory could
/// not be enumerated has no attempts and carries an error instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearOutcome {
    directory: PathBuf,
    attempted: Vec<PathBuf>,
    failed: BTreeSet<PathBuf>,
    error: Option<String>,
}

impl ClearOutcome {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            attempted: Vec::new(),
            failed: BTreeSet::new(),
            error: None,
        }
    }

    /// Outcome for a directory that could not be enumerated
    pub fn unreadable(directory: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::new(directory)
        }
    }

    pub fn record_success(&mut self, entry: impl Into<PathBuf>) {
        self.attempted.push(entry.into());
    }

    pub fn record_failure(&mut self, entry: impl Into<PathBuf>) {
        let entry = entry.into();
        self.failed.insert(entry.clone());
        self.attempted.push(entry);
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn attempted(&self) -> &[PathBuf] {
        &self.attempted
    }

    pub fn failed(&self) -> &BTreeSet<PathBuf> {
        &self.failed
    }

    /// Directory access error, if enumeration failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.failed.is_empty() && self.error.is_none()
    }

    /// File names of failed entries, for logs and assertions
    pub fn failed_names(&self) -> Vec<String> {
        self.failed
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}
