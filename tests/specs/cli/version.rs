//! Version specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn version_word_prints_name_and_version() {
    let output = clear_temp().arg("version").passes();
    assert_eq!(output.stdout(), "clear-temp version: v0.1.0\n");
}

#[test]
fn version_output_is_a_semver() {
    clear_temp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::is_match(r"^clear-temp version: v\d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn version_flags_match_version_word() {
    clear_temp()
        .arg("-v")
        .passes()
        .stdout_has("clear-temp version: v0.1.0");
    clear_temp()
        .arg("--version")
        .passes()
        .stdout_has("clear-temp version: v0.1.0");
}

#[test]
fn version_does_not_touch_the_directory() {
    let scratch = Scratch::with_files(&["keep.txt"]);
    scratch.once().arg("version").passes();
    assert_eq!(scratch.entries(), vec!["keep.txt".to_string()]);
}
