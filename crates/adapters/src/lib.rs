// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: desktop notifications and entry removal

pub mod notify;
pub mod remove;
pub mod traced;

pub use notify::{
    Backend, DesktopNotifier, NoOpNotifyAdapter, Notification, NotifyAdapter, NotifyError,
};
pub use remove::{EntryRemover, FsRemover};
pub use traced::{TracedNotifyAdapter, TracedRemover};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use remove::{FakeRemover, RemoveCall};
