// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer-driven scheduling of the clearing job
//!
//! One recurrence is armed at a time. A firing that arrives while the
//! previous pass is still running is dropped, never queued.

use chrono::NaiveDateTime;
use ct_core::{Clock, ClockError, JobEvent, JobState, RunMode, ScheduleSpec};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Longest single sleep while waiting for a fire time
const MAX_SLEEP_STEP: Duration = Duration::from_secs(60);

/// Errors from registering a recurrence
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("schedule '{0}' has no upcoming fire time")]
    NoUpcomingFire(String),
    #[error("cannot register a schedule while {0}")]
    InvalidState(JobState),
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Result of a single firing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireResult<T> {
    Completed(T),
    /// The job was not run; carries the state that refused it
    Dropped(JobState),
}

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerExit {
    /// Shutdown was requested
    Shutdown,
    /// Single-shot mode finished its pass
    Terminated,
    /// No further fire time could be computed
    Exhausted,
}

#[derive(Debug, Default)]
struct Inner {
    state: JobState,
    spec: Option<ScheduleSpec>,
    next_fire: Option<NaiveDateTime>,
    run_count: u64,
    dropped_count: u64,
}

/// Arms a recurrence and runs the job on every matching firing
pub struct JobScheduler<C> {
    clock: C,
    mode: RunMode,
    inner: Mutex<Inner>,
}

impl<C: Clock> JobScheduler<C> {
    pub fn new(clock: C, mode: RunMode) -> Self {
        Self {
            clock,
            mode,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> JobState {
        self.inner().state
    }

    pub fn next_fire(&self) -> Option<NaiveDateTime> {
        self.inner().next_fire
    }

    pub fn run_count(&self) -> u64 {
        self.inner().run_count
    }

    pub fn dropped_count(&self) -> u64 {
        self.inner().dropped_count
    }

    /// Arm the timer for `spec`, returning the first fire time
    pub fn register(&self, spec: ScheduleSpec) -> Result<NaiveDateTime, SchedulerError> {
        let now = self.clock.now()?;
        let mut inner = self.inner();

        let Some(next) = spec.next_after(now) else {
            inner.state = inner.state.transition(JobEvent::Reject, self.mode).to;
            return Err(SchedulerError::NoUpcomingFire(spec.to_string()));
        };

        let transition = inner.state.transition(JobEvent::Register, self.mode);
        if !transition.applied {
            return Err(SchedulerError::InvalidState(inner.state));
        }

        info!(schedule = %spec, next_fire = %next, "schedule registered");
        inner.state = transition.to;
        inner.spec = Some(spec);
        inner.next_fire = Some(next);
        Ok(next)
    }

    /// Run `job` for one firing unless a pass is already running
    pub async fn fire<T>(&self, job: impl Future<Output = T>) -> FireResult<T> {
        let fired_at = {
            let mut inner = self.inner();
            let transition = inner.state.transition(JobEvent::Fire, self.mode);
            if !transition.applied {
                inner.dropped_count += 1;
                warn!(state = %inner.state, "firing dropped");
                return FireResult::Dropped(inner.state);
            }
            inner.state = transition.to;
            inner.next_fire.take()
        };

        debug!("firing");
        let result = job.await;

        self.complete(fired_at);
        FireResult::Completed(result)
    }

    fn complete(&self, fired_at: Option<NaiveDateTime>) {
        let now = self.clock.now();
        let mut inner = self.inner();
        inner.run_count += 1;
        inner.state = inner.state.transition(JobEvent::Complete, self.mode).to;

        if inner.state != JobState::Scheduled {
            return;
        }

        // Never fire the same slot twice, even if the clock lags the timer
        let from = match (now, fired_at) {
            (Ok(now), Some(fired)) => Some(now.max(fired)),
            (Ok(now), None) => Some(now),
            (Err(e), fired) => {
                warn!(error = %e, "cannot read clock after pass");
                fired
            }
        };
        let next = from.and_then(|from| inner.spec.as_ref()?.next_after(from));

        match next {
            Some(next) => {
                info!(next_fire = %next, "re-armed");
                inner.next_fire = Some(next);
            }
            None => {
                warn!("no further fire time, going idle");
                inner.state = inner.state.transition(JobEvent::Reject, self.mode).to;
            }
        }
    }

    /// Wait for each fire time and run `job`, until `shutdown` completes,
    /// single-shot mode terminates, or no fire time remains.
    ///
    /// A pass in progress always runs to completion before shutdown is
    /// observed.
    pub async fn run<F, Fut, T>(
        &self,
        mut job: F,
        shutdown: impl Future<Output = ()>,
    ) -> Result<SchedulerExit, SchedulerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        tokio::pin!(shutdown);

        loop {
            if self.state().is_final() {
                return Ok(SchedulerExit::Terminated);
            }
            let Some(next) = self.next_fire() else {
                return Ok(SchedulerExit::Exhausted);
            };

            debug!(next_fire = %next, "waiting");

            // The wall clock is re-read after every step, so DST changes,
            // suspend and clock steps move the firing with it
            loop {
                let wait = (next - self.clock.now()?).to_std().unwrap_or(Duration::ZERO);
                let step = wait.min(MAX_SLEEP_STEP);

                tokio::select! {
                    _ = &mut shutdown => {
                        info!("shutdown requested");
                        return Ok(SchedulerExit::Shutdown);
                    }
                    _ = tokio::time::sleep(step) => {}
                }

                if wait <= MAX_SLEEP_STEP {
                    break;
                }
            }

            // Dropped firings are logged in fire()
            let _ = self.fire(job()).await;
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
