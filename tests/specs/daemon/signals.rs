//! Daemon shutdown specs
//!
//! The daemon stays armed until SIGINT or SIGTERM, then exits cleanly.

use crate::prelude::*;
use similar_asserts::assert_eq;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::{BufRead, BufReader};
use std::process::{Child, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(10);

/// Start the daemon on a weekly schedule and wait until it is armed
fn start_daemon(scratch: &Scratch) -> Child {
    let mut child = std::process::Command::new(bin_path())
        .args(["--no-notify", "--log-level", "info"])
        .args(["time", "03:17:29", "day", "3"])
        .arg("--dir")
        .arg(scratch.path())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let stderr = child.stderr.take().unwrap();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        // Keep draining after the receiver is gone so the daemon never blocks on stderr
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            let _ = tx.send(line);
        }
    });

    let deadline = Instant::now() + TIMEOUT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) if line.contains("clear-temp armed") => return child,
            Ok(_) => continue,
            Err(e) => {
                let _ = child.kill();
                panic!("daemon never armed: {e}");
            }
        }
    }
}

fn wait_with_timeout(child: &mut Child) -> std::process::ExitStatus {
    let deadline = Instant::now() + TIMEOUT;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("daemon did not exit after signal");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn stop_with(signal: Signal) {
    let scratch = Scratch::with_files(&["keep.txt"]);
    let mut child = start_daemon(&scratch);

    kill(Pid::from_raw(child.id() as i32), signal).unwrap();
    let status = wait_with_timeout(&mut child);

    assert_eq!(status.code(), Some(0));
}

#[test]
fn sigterm_stops_daemon_cleanly() {
    stop_with(Signal::SIGTERM);
}

#[test]
fn sigint_stops_daemon_cleanly() {
    stop_with(Signal::SIGINT);
}
