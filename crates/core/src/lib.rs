// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ct-core: Core types for the clear-temp scheduler
//!
//! This crate provides:
//! - A clock abstraction for reading local wall-clock time
//! - Validated recurrence specifications and the builder that derives them
//! - The job state machine driving each clearing cycle
//! - The aggregate outcome of a clearing pass

pub mod clock;
pub mod job;
pub mod outcome;
pub mod schedule;

pub use clock::{resolve_local_time, Clock, ClockError, FakeClock, LocalTime, SystemClock};
pub use job::{JobEvent, JobState, RunMode, Transition};
pub use outcome::ClearOutcome;
pub use schedule::{DaySet, ScheduleBuilder, ScheduleError, ScheduleSpec, TimeOfDay};
