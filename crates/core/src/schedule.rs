// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurrence specifications for the clearing job
//!
//! A [`ScheduleSpec`] fires at one time of day on a set of weekdays, the
//! same shape as a six-field cron line `S M H * * DAYS`. Specs are only
//! produced by parsing and validation, so anything holding one may hand
//! it to a timer without further checks.

use crate::clock::LocalTime;
use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of days searched for the next firing; one full week plus today.
const LOOKAHEAD_DAYS: i64 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid time '{input}': {reason}")]
    InvalidTime { input: String, reason: String },
    #[error("invalid day expression '{input}': {reason}")]
    InvalidDay { input: String, reason: String },
}

impl ScheduleError {
    fn time(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTime {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    fn day(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDay {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A validated time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
    second: u32,
}

impl TimeOfDay {
    /// Time used when only a day override is given
    pub const DEFAULT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 1,
        second: 0,
    };

    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ScheduleError> {
        let input = format!("{:02}:{:02}:{:02}", hour, minute, second);
        if hour > 23 {
            return Err(ScheduleError::time(&input, "hour must be within 0-23"));
        }
        if minute > 59 {
            return Err(ScheduleError::time(&input, "minute must be within 0-59"));
        }
        if second > 59 {
            return Err(ScheduleError::time(&input, "second must be within 0-59"));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// One second after the given reading, carrying into minute and hour
    /// and wrapping at midnight.
    pub fn one_second_after(reading: LocalTime) -> Result<Self, ScheduleError> {
        let base = NaiveTime::from_hms_opt(reading.hour, reading.minute, reading.second)
            .ok_or_else(|| {
                ScheduleError::time(
                    &format!("{}:{}:{}", reading.hour, reading.minute, reading.second),
                    "clock reading is not a valid time of day",
                )
            })?;
        let (next, _) = base.overflowing_add_signed(TimeDelta::seconds(1));
        Ok(Self::from(next))
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    fn as_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parses `HH:MM:SS` or `HH:MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let parts: Vec<&str> = input.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(ScheduleError::time(input, "expected HH:MM:SS"));
        }

        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(ScheduleError::time(input, format!("'{}' is not a number", part)));
            }
            *slot = part
                .parse()
                .map_err(|_| ScheduleError::time(input, format!("'{}' is out of range", part)))?;
        }

        Self::new(fields[0], fields[1], fields[2])
            .map_err(|e| match e {
                ScheduleError::InvalidTime { reason, .. } => ScheduleError::time(input, reason),
                other => other,
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// A set of weekdays, 0 = Sunday through 6 = Saturday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySet {
    mask: u8,
    expr: String,
}

impl DaySet {
    /// Every day of the week
    pub fn all() -> Self {
        Self {
            mask: 0b111_1111,
            expr: "0-6".to_string(),
        }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.mask & (1 << day.num_days_from_sunday()) != 0
    }

    /// Day numbers in ascending order
    pub fn days(&self) -> Vec<u8> {
        (0..7).filter(|d| self.mask & (1 << d) != 0).collect()
    }

    fn parse_value(input: &str, token: &str) -> Result<u8, ScheduleError> {
        let value: u32 = token
            .parse()
            .map_err(|_| ScheduleError::day(input, format!("'{}' is not a day number", token)))?;
        if value > 6 {
            return Err(ScheduleError::day(
                input,
                format!("day {} is outside 0-6", value),
            ));
        }
        Ok(value as u8)
    }

    fn parse_term(input: &str, term: &str) -> Result<u8, ScheduleError> {
        if term.is_empty() {
            return Err(ScheduleError::day(input, "empty list element"));
        }

        let (range, step) = match term.split_once('/') {
            Some((range, step)) => {
                let step: u8 = step
                    .parse()
                    .map_err(|_| ScheduleError::day(input, format!("'{}' is not a step", step)))?;
                if step == 0 {
                    return Err(ScheduleError::day(input, "step must be at least 1"));
                }
                (range, Some(step))
            }
            None => (term, None),
        };

        let (start, end) = if range == "*" {
            (0, 6)
        } else if let Some((lo, hi)) = range.split_once('-') {
            let (lo, hi) = (Self::parse_value(input, lo)?, Self::parse_value(input, hi)?);
            if lo > hi {
                return Err(ScheduleError::day(
                    input,
                    format!("range {}-{} is reversed", lo, hi),
                ));
            }
            (lo, hi)
        } else {
            let value = Self::parse_value(input, range)?;
            // `n/step` runs from n to the end of the week
            if step.is_some() {
                (value, 6)
            } else {
                (value, value)
            }
        };

        let step = step.unwrap_or(1);
        Ok((start..=end)
            .step_by(step as usize)
            .fold(0u8, |mask, d| mask | (1 << d)))
    }
}

impl FromStr for DaySet {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if expr.is_empty() {
            return Err(ScheduleError::day(s, "expression is empty"));
        }

        let mut mask = 0u8;
        for term in expr.split(',') {
            mask |= Self::parse_term(&expr, term)?;
        }

        Ok(Self { mask, expr })
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// A validated recurrence: one time of day on a set of weekdays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSpec {
    time: TimeOfDay,
    days: DaySet,
}

impl ScheduleSpec {
    pub fn new(time: TimeOfDay, days: DaySet) -> Self {
        Self { time, days }
    }

    pub fn second(&self) -> u32 {
        self.time.second
    }

    pub fn minute(&self) -> u32 {
        self.time.minute
    }

    pub fn hour(&self) -> u32 {
        self.time.hour
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn days(&self) -> &DaySet {
        &self.days
    }

    /// First matching instant strictly after `now`
    pub fn next_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let time = self.time.as_naive()?;
        (0..LOOKAHEAD_DAYS)
            .filter_map(|offset| now.date().checked_add_signed(TimeDelta::days(offset)))
            .filter(|date| self.days.contains(date.weekday()))
            .map(|date| date.and_time(time))
            .find(|candidate| *candidate > now)
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} * * {}",
            self.time.second, self.time.minute, self.time.hour, self.days
        )
    }
}

/// Builds a [`ScheduleSpec`] from a clock reading and optional overrides
///
/// | time override | day override | result                               |
/// |---------------|--------------|--------------------------------------|
/// | no            | no           | reading + 1s, every day              |
/// | no            | yes          | `00:01:00` on the given days         |
/// | yes           | no           | given time, every day                |
/// | yes           | yes          | both as given                        |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleBuilder {
    time: Option<String>,
    days: Option<String>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn days(mut self, days: impl Into<String>) -> Self {
        self.days = Some(days.into());
        self
    }

    pub fn time_override(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn days_override(&self) -> Option<&str> {
        self.days.as_deref()
    }

    pub fn has_overrides(&self) -> bool {
        self.time.is_some() || self.days.is_some()
    }

    pub fn build(&self, reading: LocalTime) -> Result<ScheduleSpec, ScheduleError> {
        let days = match &self.days {
            Some(expr) => expr.parse()?,
            None => DaySet::all(),
        };
        let time = match (&self.time, &self.days) {
            (Some(time), _) => time.parse()?,
            (None, Some(_)) => TimeOfDay::DEFAULT,
            (None, None) => TimeOfDay::one_second_after(reading)?,
        };
        Ok(ScheduleSpec::new(time, days))
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
