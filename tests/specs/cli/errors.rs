//! Startup error specs
//!
//! Invalid input is reported with context and never clears anything.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn out_of_range_day_is_rejected() {
    let scratch = Scratch::with_files(&["keep.txt"]);

    scratch
        .once()
        .args(["day", "9"])
        .fails_with(1)
        .stderr_has("error: Invalid schedule")
        .stderr_has("'9'")
        .stderr_has("clear-temp day 1-5");

    assert_eq!(scratch.entries(), vec!["keep.txt".to_string()]);
}

#[test]
fn out_of_range_time_is_rejected() {
    Scratch::empty()
        .once()
        .args(["--time", "24:00:00"])
        .fails_with(1)
        .stderr_has("Invalid schedule")
        .stderr_has("HH:MM:SS");
}

#[test]
fn unknown_word_is_rejected() {
    clear_temp()
        .arg("loud")
        .fails_with(1)
        .stderr_has("Unknown option 'loud'");
}

#[test]
fn word_missing_its_value_is_rejected() {
    clear_temp()
        .arg("time")
        .fails_with(1)
        .stderr_has("Option 'time' needs a value");
}

#[test]
fn invalid_log_level_is_rejected() {
    Command::new(bin_path())
        .args(["--no-notify", "--log-level", "ct_engine=verbose"])
        .fails_with(1)
        .stderr_has("Invalid log level");
}

#[test]
fn unknown_flag_is_a_startup_error() {
    let scratch = Scratch::with_files(&["keep.txt"]);

    scratch
        .once()
        .arg("--bogus")
        .fails_with(1)
        .stderr_has("--bogus");

    assert_eq!(scratch.entries(), vec!["keep.txt".to_string()]);
}

#[test]
fn zero_workers_is_a_startup_error() {
    Scratch::empty()
        .once()
        .args(["--workers", "0"])
        .fails_with(1)
        .stderr_has("--workers");
}

#[test]
fn help_exits_cleanly() {
    clear_temp().arg("--help").passes().stdout_has("Usage:");
}
