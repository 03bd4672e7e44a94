// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a clearing outcome into a desktop notification

use ct_adapters::{Notification, NotifyAdapter};
use ct_core::ClearOutcome;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

pub const SUCCESS_MESSAGE: &str = "Successfully cleared";
pub const FAILURE_MESSAGE: &str = "Failed to clear";

/// Notification settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub title: String,
    pub sound: bool,
    pub icon: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Clear Temp".to_string(),
            sound: false,
            icon: None,
        }
    }
}

/// Terminal status of one clearing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Cleared,
    Failed,
}

impl From<&ClearOutcome> for CycleStatus {
    fn from(outcome: &ClearOutcome) -> Self {
        if outcome.succeeded() {
            CycleStatus::Cleared
        } else {
            CycleStatus::Failed
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStatus::Cleared => write!(f, "cleared"),
            CycleStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Whether the notification reached the notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed(String),
}

/// Reports clearing outcomes through a notification adapter
#[derive(Clone)]
pub struct ResultReporter<N> {
    notifier: N,
    config: ReportConfig,
}

impl<N: NotifyAdapter> ResultReporter<N> {
    pub fn new(notifier: N, config: ReportConfig) -> Self {
        Self { notifier, config }
    }

    pub fn notification_for(&self, outcome: &ClearOutcome) -> Notification {
        let message = match CycleStatus::from(outcome) {
            CycleStatus::Cleared => SUCCESS_MESSAGE,
            CycleStatus::Failed => FAILURE_MESSAGE,
        };
        let notification =
            Notification::new(self.config.title.clone(), message).with_sound(self.config.sound);
        match &self.config.icon {
            Some(icon) => notification.with_icon(icon.clone()),
            None => notification,
        }
    }

    /// Send the notification for `outcome`. Delivery problems are logged
    /// and returned, never raised.
    pub async fn report(&self, outcome: &ClearOutcome) -> Delivery {
        let notification = self.notification_for(outcome);
        match self.notifier.notify(&notification).await {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                warn!(error = %e, message = %notification.message, "could not deliver notification");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;
