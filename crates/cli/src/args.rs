// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments
//!
//! Options are accepted both as flags and as bare words
//! (`clear-temp sound time 08:30:00 day 1-5`).

use crate::error::CliError;
use clap::Parser;
use ct_core::{RunMode, ScheduleBuilder};
use ct_engine::{ClearConfig, ReportConfig, RuntimeConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clear-temp",
    about = "Clear the temp directory on a recurring schedule",
    disable_version_flag = true,
    after_help = "Words:\n  version            Print version\n  sound              Notification sound\n  time, t <HH:MM:SS> Time of day to clear (default 00:01:00 with a day)\n  day, d <EXPR>      Days of week, cron style 0-6 (default 0-6)\n\nExamples:\n  clear-temp\n  clear-temp version\n  clear-temp sound time 08:30:00 day 1-5"
)]
pub struct Cli {
    /// Option words: version, sound, time <HH:MM:SS>, day <EXPR>
    pub words: Vec<String>,

    /// Print version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Play a sound with the notification
    #[arg(short = 's', long)]
    pub sound: bool,

    /// Time of day to clear
    #[arg(long, value_name = "HH:MM:SS")]
    pub time: Option<String>,

    /// Days of week to clear, 0 = Sunday
    #[arg(long, value_name = "EXPR")]
    pub day: Option<String>,

    /// Run a single cycle, then exit
    #[arg(long)]
    pub once: bool,

    /// Directory to clear [default: the system temp directory]
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Maximum concurrent removals
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Icon shown with the notification (notify-send only) [default: none]
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Do not send desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Log filter directive
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

/// Options given as bare words
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Words {
    pub version: bool,
    pub sound: bool,
    pub time: Option<String>,
    pub day: Option<String>,
}

impl Words {
    pub fn parse(words: &[String]) -> Result<Self, CliError> {
        let mut parsed = Words::default();
        let mut iter = words.iter();
        while let Some(word) = iter.next() {
            match word.as_str() {
                "version" => parsed.version = true,
                "sound" => parsed.sound = true,
                "time" | "t" => parsed.time = Some(value_for(word, iter.next())?),
                "day" | "d" => parsed.day = Some(value_for(word, iter.next())?),
                other => return Err(CliError::unknown_word(other)),
            }
        }
        Ok(parsed)
    }
}

fn value_for(word: &str, value: Option<&String>) -> Result<String, CliError> {
    value.cloned().ok_or_else(|| CliError::missing_value(word))
}

impl Cli {
    /// Merge bare words into flags. A flag wins over a word for the same option.
    pub fn resolve(self) -> Result<Options, CliError> {
        let words = Words::parse(&self.words)?;

        let mut schedule = ScheduleBuilder::new();
        if let Some(time) = self.time.or(words.time) {
            schedule = schedule.time(time);
        }
        if let Some(day) = self.day.or(words.day) {
            schedule = schedule.days(day);
        }

        let mut clear = ClearConfig::default();
        if let Some(workers) = self.workers {
            clear.workers = usize::from(workers);
        }

        let config = RuntimeConfig {
            target_dir: self.dir.unwrap_or_else(std::env::temp_dir),
            schedule,
            mode: if self.once { RunMode::Once } else { RunMode::Daemon },
            clear,
            report: ReportConfig {
                sound: self.sound || words.sound,
                icon: self.icon,
                ..ReportConfig::default()
            },
        };

        Ok(Options {
            version: self.version || words.version,
            notify: !self.no_notify,
            log_level: self.log_level,
            config,
        })
    }
}

/// Fully resolved invocation
#[derive(Debug)]
pub struct Options {
    pub version: bool,
    pub notify: bool,
    pub log_level: String,
    pub config: RuntimeConfig,
}
