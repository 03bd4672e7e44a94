//! Shared helpers for CLI specs

pub use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn bin_path() -> PathBuf {
    assert_cmd::cargo::cargo_bin("clear-temp")
}

/// `clear-temp` with notifications off and quiet logs
pub fn clear_temp() -> Command {
    let mut cmd = Command::new(bin_path());
    cmd.args(["--no-notify", "--log-level", "warn"]);
    cmd
}

/// A scratch directory standing in for the temp directory
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn with_files(names: &[&str]) -> Self {
        let scratch = Self::empty();
        for name in names {
            scratch.file(name, name);
        }
        scratch
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// `clear-temp --once` against this directory
    pub fn once(&self) -> Command {
        let mut cmd = clear_temp();
        cmd.arg("--once").arg("--dir").arg(self.path());
        cmd
    }
}

/// Fluent assertions on a finished command
pub trait CommandExt {
    fn passes(&mut self) -> Output;
    fn fails_with(&mut self, code: i32) -> Output;
}

impl CommandExt for Command {
    fn passes(&mut self) -> Output {
        let output = self.output().unwrap();
        if !output.status.success() {
            panic!(
                "expected success, got {:?}\nstderr:\n{}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Output(output)
    }

    fn fails_with(&mut self, code: i32) -> Output {
        let output = self.output().unwrap();
        if output.status.code() != Some(code) {
            panic!(
                "expected exit code {}, got {:?}\nstderr:\n{}",
                code,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Output(output)
    }
}

pub struct Output(std::process::Output);

impl Output {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        if !stdout.contains(expected) {
            panic!("stdout missing {:?}\nstdout:\n{}", expected, stdout);
        }
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        if !stderr.contains(expected) {
            panic!("stderr missing {:?}\nstderr:\n{}", expected, stderr);
        }
        self
    }
}
