// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime factory with production adapters

use async_trait::async_trait;
use ct_adapters::{
    DesktopNotifier, FsRemover, NoOpNotifyAdapter, Notification, NotifyAdapter, NotifyError,
    TracedNotifyAdapter, TracedRemover,
};
use ct_core::SystemClock;
use ct_engine::{Runtime, RuntimeConfig, RuntimeDeps, RuntimeError};

/// Notifier selected by `--no-notify`
#[derive(Clone)]
pub enum CliNotifier {
    Desktop(TracedNotifyAdapter<DesktopNotifier>),
    Silent(NoOpNotifyAdapter),
}

impl CliNotifier {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            CliNotifier::Desktop(TracedNotifyAdapter::new(DesktopNotifier::new("clear-temp")))
        } else {
            CliNotifier::Silent(NoOpNotifyAdapter::new())
        }
    }
}

#[async_trait]
impl NotifyAdapter for CliNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match self {
            CliNotifier::Desktop(n) => n.notify(notification).await,
            CliNotifier::Silent(n) => n.notify(notification).await,
        }
    }
}

pub type CliRuntime = Runtime<TracedRemover<FsRemover>, CliNotifier, SystemClock>;

/// Build a runtime on the real filesystem, clock and notification service
pub fn make_runtime(config: RuntimeConfig, notify: bool) -> Result<CliRuntime, RuntimeError> {
    Runtime::build(
        config,
        RuntimeDeps {
            remover: TracedRemover::new(FsRemover::new()),
            notify: CliNotifier::new(notify),
            clock: SystemClock,
        },
    )
}
