// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remover for testing
//!
//! Deletes through [`FsRemover`] unless an entry's file name is configured
//! as locked, busy, or denied. Tracks how many removals run at once.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EntryRemover, FsRemover};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded removal attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveCall {
    pub path: PathBuf,
}

#[derive(Default)]
struct FakeState {
    locked: HashSet<String>,
    denied: HashSet<String>,
    busy: HashMap<String, u32>,
    delay: Option<Duration>,
    calls: Vec<RemoveCall>,
}

/// Fake remover for testing
#[derive(Clone, Default)]
pub struct FakeRemover {
    state: Arc<Mutex<FakeState>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeRemover {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Entry is held open by another process: every attempt is busy
    pub fn lock(&self, name: impl Into<String>) {
        self.state().locked.insert(name.into());
    }

    /// Entry reports busy for the first `attempts` tries, then removes
    pub fn busy_for(&self, name: impl Into<String>, attempts: u32) {
        self.state().busy.insert(name.into(), attempts);
    }

    /// Entry cannot be removed for lack of permission
    pub fn deny(&self, name: impl Into<String>) {
        self.state().denied.insert(name.into());
    }

    /// Sleep before every removal to simulate a slow pass
    pub fn set_delay(&self, delay: Duration) {
        self.state().delay = Some(delay);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RemoveCall> {
        self.state().calls.clone()
    }

    /// Number of attempts made on entries with the given file name
    pub fn attempts_for(&self, name: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| file_name(&c.path) == name)
            .count()
    }

    /// Highest number of removals observed running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn check(&self, name: &str) -> io::Result<()> {
        let mut state = self.state();
        if state.locked.contains(name) {
            return Err(io::Error::new(
                io::ErrorKind::ResourceBusy,
                format!("{} is locked", name),
            ));
        }
        if state.denied.contains(name) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is protected", name),
            ));
        }
        if let Some(remaining) = state.busy.get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(io::Error::new(
                    io::ErrorKind::ResourceBusy,
                    format!("{} is briefly busy", name),
                ));
            }
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl EntryRemover for FakeRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = {
            let mut state = self.state();
            state.calls.push(RemoveCall {
                path: path.to_path_buf(),
            });
            state.delay
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let result = self
            .check(&file_name(path))
            .and_then(|()| FsRemover.remove(path));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
