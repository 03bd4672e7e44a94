// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state machine for the recurring clearing job
//!
//! ```text
//! Idle --Register--> Scheduled --Fire--> Running --Complete--> Scheduled (daemon)
//!                                                          \-> Terminated (once)
//! ```
//!
//! A Fire while Running is not applied: the scheduler drops that firing
//! instead of queueing it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens after a clearing pass completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Re-arm for the next matching day
    #[default]
    Daemon,
    /// Stop after the first pass
    Once,
}

/// The current state of the clearing job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// No recurrence registered
    #[default]
    Idle,
    /// Timer armed, awaiting fire
    Scheduled,
    /// Clearing in progress
    Running,
    /// Finished for good (single-shot mode)
    Terminated,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::Scheduled => write!(f, "scheduled"),
            JobState::Running => write!(f, "running"),
            JobState::Terminated => write!(f, "terminated"),
        }
    }
}

impl std::str::FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(JobState::Idle),
            "scheduled" => Ok(JobState::Scheduled),
            "running" => Ok(JobState::Running),
            "terminated" => Ok(JobState::Terminated),
            _ => Err(format!("unknown job state: {}", s)),
        }
    }
}

/// Events that can transition the job's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    /// A valid recurrence was armed
    Register,
    /// The timer fired
    Fire,
    /// The clearing pass finished
    Complete,
    /// Registration failed or no further fire time exists
    Reject,
}

/// Result of applying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: JobState,
    pub to: JobState,
    pub applied: bool,
}

impl JobState {
    /// Pure state transition
    pub fn transition(self, event: JobEvent, mode: RunMode) -> Transition {
        let to = match (self, event) {
            (JobState::Idle, JobEvent::Register) => Some(JobState::Scheduled),
            // Re-registering replaces the armed recurrence
            (JobState::Scheduled, JobEvent::Register) => Some(JobState::Scheduled),
            (JobState::Scheduled, JobEvent::Fire) => Some(JobState::Running),
            (JobState::Running, JobEvent::Complete) => Some(match mode {
                RunMode::Daemon => JobState::Scheduled,
                RunMode::Once => JobState::Terminated,
            }),
            (JobState::Idle, JobEvent::Reject) | (JobState::Scheduled, JobEvent::Reject) => {
                Some(JobState::Idle)
            }
            // Invalid transitions are no-ops, including Fire while Running
            _ => None,
        };

        Transition {
            from: self,
            to: to.unwrap_or(self),
            applied: to.is_some(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, JobState::Terminated)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
