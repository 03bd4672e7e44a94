// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem entry removal adapters

mod fs;

pub use fs::FsRemover;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRemover, RemoveCall};

use std::io;
use std::path::Path;

/// Adapter for deleting a single directory entry
///
/// Implementations are called from blocking threads and may be invoked
/// concurrently for different entries.
pub trait EntryRemover: Clone + Send + Sync + 'static {
    /// Remove a file, symlink, or directory tree. An entry that no longer
    /// exists counts as removed.
    fn remove(&self, path: &Path) -> io::Result<()>;
}
