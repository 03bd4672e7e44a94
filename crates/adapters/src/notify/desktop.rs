// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notifications through the platform's notification service
//!
//! macOS goes through `osascript`, everything else through `notify-send`.

use super::{Notification, NotifyAdapter, NotifyError};
use async_trait::async_trait;
use std::ffi::OsString;
use tokio::process::Command;

/// Notification backend program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Osascript,
    NotifySend,
}

impl Backend {
    fn program(&self) -> &'static str {
        match self {
            Backend::Osascript => "osascript",
            Backend::NotifySend => "notify-send",
        }
    }
}

/// Sends notifications through the host's notification service
#[derive(Clone, Debug)]
pub struct DesktopNotifier {
    backend: Backend,
    app_name: String,
}

impl DesktopNotifier {
    /// Notifier for the current platform
    pub fn new(app_name: impl Into<String>) -> Self {
        let backend = if cfg!(target_os = "macos") {
            Backend::Osascript
        } else {
            Backend::NotifySend
        };
        Self::with_backend(backend, app_name)
    }

    pub fn with_backend(backend: Backend, app_name: impl Into<String>) -> Self {
        Self {
            backend,
            app_name: app_name.into(),
        }
    }

    fn build_args(&self, notification: &Notification) -> Vec<OsString> {
        match self.backend {
            Backend::Osascript => vec!["-e".into(), build_script(notification).into()],
            Backend::NotifySend => {
                let mut args: Vec<OsString> = vec!["--app-name".into(), self.app_name.clone().into()];
                // notify-send has no sound switch; the freedesktop hint asks
                // the server for its default message sound.
                if notification.sound {
                    args.push("--hint".into());
                    args.push("string:sound-name:message-new-instant".into());
                } else {
                    args.push("--hint".into());
                    args.push("boolean:suppress-sound:true".into());
                }
                if let Some(icon) = &notification.icon {
                    args.push("--icon".into());
                    args.push(icon.clone().into_os_string());
                }
                args.push(notification.title.clone().into());
                args.push(notification.message.clone().into());
                args
            }
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("clear-temp")
    }
}

/// AppleScript for `display notification`. Icons are not supported there.
fn build_script(notification: &Notification) -> String {
    let mut script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(&notification.message),
        escape_applescript(&notification.title),
    );

    if notification.sound {
        script.push_str(r#" sound name "default""#);
    }

    script
}

/// Escape special characters for AppleScript strings
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl NotifyAdapter for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let program = self.backend.program();
        let output = Command::new(program)
            .args(self.build_args(notification))
            .output()
            .await
            .map_err(|e| NotifyError::Failed(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::Command {
                program: program.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "desktop_tests.rs"]
mod tests;
