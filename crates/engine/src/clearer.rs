// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort clearing of a directory's immediate entries
//!
//! Each entry is removed on its own blocking task. A failing entry is
//! recorded and never stops the others. Only a directory that cannot be
//! enumerated fails the whole pass.

use ct_adapters::EntryRemover;
use ct_core::ClearOutcome;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Bounded retry for entries that are briefly busy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per entry, including the first
    pub max_attempts: u32,
    /// Delay after the first failure; grows linearly with each attempt
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(100),
        }
    }
}

/// Clearing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearConfig {
    /// Maximum number of entries removed at once
    pub workers: usize,
    pub retry: RetryPolicy,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Four removals per available core
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_mul(4)
}

/// Errors worth another try: the entry is held or changing underneath us.
fn is_transient(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::ResourceBusy
        | io::ErrorKind::DirectoryNotEmpty
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock => true,
        // Windows reports files open in another process as access denied
        io::ErrorKind::PermissionDenied => cfg!(windows),
        _ => false,
    }
}

/// Clears the immediate entries of a directory
#[derive(Clone)]
pub struct TempClearer<R> {
    remover: R,
    config: ClearConfig,
}

impl<R: EntryRemover> TempClearer<R> {
    pub fn new(remover: R, config: ClearConfig) -> Self {
        Self { remover, config }
    }

    pub fn config(&self) -> &ClearConfig {
        &self.config
    }

    /// Remove every entry of `dir`, returning what was attempted and what failed
    pub async fn clear(&self, dir: &Path) -> ClearOutcome {
        let start = Instant::now();

        let entries = match list_entries(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read directory");
                return ClearOutcome::unreadable(dir, e.to_string());
            }
        };

        debug!(dir = %dir.display(), entries = entries.len(), "clearing");

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks = JoinSet::new();
        for (index, path) in entries.iter().enumerate() {
            // Waiting for a permit before spawning bounds the live tasks too
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let remover = self.remover.clone();
            let retry = self.config.retry;
            let path = path.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let result = remove_with_retry(remover, &path, retry).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<io::Result<()>>> = entries.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!(error = %e, "removal task failed to complete"),
            }
        }

        let mut outcome = ClearOutcome::new(dir);
        for (path, result) in entries.into_iter().zip(results) {
            match result {
                Some(Ok(())) => outcome.record_success(path),
                Some(Err(e)) => {
                    warn!(entry = %path.display(), error = %e, "could not remove entry");
                    outcome.record_failure(path);
                }
                None => outcome.record_failure(path),
            }
        }

        info!(
            dir = %dir.display(),
            attempted = outcome.attempted().len(),
            failed = outcome.failed().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "clearing pass finished"
        );

        outcome
    }
}

async fn list_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                Err(e) => warn!(dir = %dir.display(), error = %e, "skipping unreadable entry"),
            }
        }
        Ok::<_, io::Error>(entries)
    })
    .await
    .map_err(io::Error::other)?
}

async fn remove_with_retry<R: EntryRemover>(
    remover: R,
    path: &Path,
    retry: RetryPolicy,
) -> io::Result<()> {
    let mut attempt = 1;
    loop {
        let r = remover.clone();
        let p = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || r.remove(&p))
            .await
            .map_err(io::Error::other)
            .and_then(|r| r);

        match result {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retry.max_attempts && is_transient(&e) => {
                debug!(entry = %path.display(), attempt, error = %e, "entry busy, retrying");
                tokio::time::sleep(retry.delay_for(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "clearer_tests.rs"]
mod tests;
