// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::scheduler::SchedulerError;
use ct_core::{ClockError, ScheduleError};
use thiserror::Error;

/// Errors that prevent the clearing job from being scheduled
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("cannot read local time: {0}")]
    Clock(#[from] ClockError),
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("cannot register schedule: {0}")]
    Scheduler(#[from] SchedulerError),
}
