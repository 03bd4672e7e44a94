// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable wall-clock time

use chrono::{Local, NaiveDateTime, TimeZone, Timelike};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system clock is set before the unix epoch: {0}")]
    BeforeEpoch(String),
    #[error("system time {0}s is not representable as local time")]
    Unrepresentable(u64),
}

/// A clock that provides the current local wall-clock time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Result<NaiveDateTime, ClockError>;
}

/// Hour, minute and second of a clock reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl LocalTime {
    pub fn of(now: &NaiveDateTime) -> Self {
        Self {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// Read the current local time from a clock
pub fn resolve_local_time(clock: &impl Clock) -> Result<LocalTime, ClockError> {
    clock.now().map(|now| LocalTime::of(&now))
}

/// Real system clock in the host's local timezone
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::BeforeEpoch(e.to_string()))?;
        let secs = since_epoch.as_secs();
        let local = i64::try_from(secs)
            .ok()
            .and_then(|s| Local.timestamp_opt(s, since_epoch.subsec_nanos()).earliest())
            .ok_or(ClockError::Unrepresentable(secs))?;
        Ok(local.naive_local())
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Ok(delta) = chrono::Duration::from_std(duration) {
            *current += delta;
        }
    }

    /// Set the clock to a specific time
    pub fn set(&self, time: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = time;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(NaiveDateTime::default())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        Ok(*self.current.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
