// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::notify::{Notification, NotifyAdapter, NotifyError};
use crate::remove::EntryRemover;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any NotifyAdapter
#[derive(Clone)]
pub struct TracedNotifyAdapter<N> {
    inner: N,
}

impl<N> TracedNotifyAdapter<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: NotifyAdapter> NotifyAdapter for TracedNotifyAdapter<N> {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify.send", title = %notification.title);

        async {
            tracing::debug!(
                message = %notification.message,
                sound = notification.sound,
                "sending"
            );

            let start = std::time::Instant::now();
            let result = self.inner.notify(notification).await;
            let elapsed = start.elapsed();

            // Delivery failure is not fatal to the caller
            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "notification delivered"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "notification failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any EntryRemover
#[derive(Clone)]
pub struct TracedRemover<R> {
    inner: R,
}

impl<R> TracedRemover<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: EntryRemover> EntryRemover for TracedRemover<R> {
    fn remove(&self, path: &Path) -> io::Result<()> {
        let span = tracing::debug_span!("entry.remove", path = %path.display());
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.remove(path);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "removed"),
            Err(e) => tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                kind = ?e.kind(),
                "remove failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
