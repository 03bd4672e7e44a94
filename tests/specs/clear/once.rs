//! Single-shot clearing specs

use crate::prelude::*;

#[test]
fn once_clears_files_and_directories() {
    let scratch = Scratch::with_files(&["a.txt", "b.txt"]);
    scratch.file("nested/deeper/c.log", "c");

    scratch.once().passes();

    assert!(scratch.entries().is_empty());
    assert!(scratch.path().exists());
}

#[test]
fn once_on_empty_directory_succeeds() {
    let scratch = Scratch::empty();
    scratch.once().passes();
    assert!(scratch.entries().is_empty());
}

#[test]
fn once_on_missing_directory_fails_the_cycle() {
    let scratch = Scratch::empty();
    let missing = scratch.path().join("gone");

    clear_temp()
        .arg("--once")
        .arg("--dir")
        .arg(&missing)
        .fails_with(2);
}

#[test]
fn once_accepts_sound_and_worker_options() {
    let scratch = Scratch::with_files(&["a.txt", "b.txt", "c.txt"]);

    scratch.once().args(["sound", "--workers", "1"]).passes();

    assert!(scratch.entries().is_empty());
}

#[test]
fn piped_logs_carry_no_colour_codes() {
    let scratch = Scratch::with_files(&["a.txt"]);

    let output = Command::new(bin_path())
        .args(["--no-notify", "--log-level", "info", "--once", "--dir"])
        .arg(scratch.path())
        .passes()
        .stderr_has("clear-temp starting");

    assert!(!output.stderr().contains('\x1b'), "{}", output.stderr());
}
