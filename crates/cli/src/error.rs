// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong, why it might have happened, and how
//! to fix it.

use ct_core::ScheduleError;
use ct_engine::RuntimeError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures an operator can hit at startup.
impl CliError {
    /// A bare word that is not an option.
    pub fn unknown_word(word: &str) -> Self {
        CliError::new(format!("Unknown option '{}'", word))
            .with_context("Options are version, sound, time (t) and day (d)")
            .with_suggestion("See all options: clear-temp --help")
    }

    /// `time` or `day` given without a value.
    pub fn missing_value(word: &str) -> Self {
        let example = match word {
            "time" | "t" => "clear-temp time 08:30:00",
            _ => "clear-temp day 1-5",
        };
        CliError::new(format!("Option '{}' needs a value", word))
            .with_suggestion(format!("Pass the value after the word: {}", example))
    }

    /// A time or day override that does not form a valid schedule.
    pub fn invalid_schedule(err: ScheduleError) -> Self {
        let base = CliError::new("Invalid schedule").with_context(err.to_string());
        let base = match &err {
            ScheduleError::InvalidTime { .. } => base
                .with_context("Times are HH:MM:SS or HH:MM on a 24 hour clock")
                .with_suggestion("Clear at half past eight: clear-temp time 08:30:00"),
            ScheduleError::InvalidDay { .. } => base
                .with_context("Days are numbers 0-6, where 0 is Sunday")
                .with_context("Ranges (1-5), lists (0,6) and steps (*/2) are accepted")
                .with_suggestion("Clear on weekdays: clear-temp day 1-5")
                .with_suggestion("Clear every day: clear-temp day '*'"),
        };
        base.with_source(err)
    }

    /// The system clock could not be read.
    pub fn clock_unreadable(err: ct_core::ClockError) -> Self {
        CliError::new("Cannot read the local time")
            .with_context(err.to_string())
            .with_suggestion("Check the system clock and timezone settings")
            .with_source(err)
    }

    /// The `--log-level` directive could not be parsed.
    pub fn invalid_log_filter(filter: &str, reason: impl fmt::Display) -> Self {
        CliError::new(format!("Invalid log level '{}'", filter))
            .with_context(reason.to_string())
            .with_suggestion("Use a level such as: --log-level debug")
            .with_suggestion("Or per target: --log-level ct_engine=debug,info")
    }
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Clock(e) => CliError::clock_unreadable(e),
            RuntimeError::Schedule(e) => CliError::invalid_schedule(e),
            RuntimeError::Scheduler(e) => CliError::new("Cannot register the schedule")
                .with_context(e.to_string())
                .with_suggestion("Pick a time and day that can occur: clear-temp time 00:01:00 day 0-6")
                .with_source(e),
        }
    }
}
