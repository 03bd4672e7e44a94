// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! clear-temp execution engine

mod clearer;
mod error;
mod reporter;
mod runtime;
mod scheduler;

pub use clearer::{default_workers, ClearConfig, RetryPolicy, TempClearer};
pub use error::RuntimeError;
pub use reporter::{
    CycleStatus, Delivery, ReportConfig, ResultReporter, FAILURE_MESSAGE, SUCCESS_MESSAGE,
};
pub use runtime::{CycleReport, RunSummary, Runtime, RuntimeConfig, RuntimeDeps};
pub use scheduler::{FireResult, JobScheduler, SchedulerError, SchedulerExit};
