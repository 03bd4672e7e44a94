// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the clear-temp engine
//!
//! Wires the clock, schedule, clearer and reporter together. Building a
//! runtime only reads the clock; timers are armed by [`Runtime::run`].

use crate::clearer::{ClearConfig, TempClearer};
use crate::reporter::{CycleStatus, Delivery, ReportConfig, ResultReporter};
use crate::scheduler::{JobScheduler, SchedulerExit};
use crate::RuntimeError;
use ct_adapters::{EntryRemover, NotifyAdapter};
use ct_core::{resolve_local_time, ClearOutcome, Clock, RunMode, ScheduleBuilder, ScheduleSpec};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory whose entries are cleared
    pub target_dir: PathBuf,
    pub schedule: ScheduleBuilder,
    pub mode: RunMode,
    pub clear: ClearConfig,
    pub report: ReportConfig,
}

impl RuntimeConfig {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            schedule: ScheduleBuilder::new(),
            mode: RunMode::default(),
            clear: ClearConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

/// Runtime adapter dependencies
pub struct RuntimeDeps<R, N, C> {
    pub remover: R,
    pub notify: N,
    pub clock: C,
}

/// Everything one clearing cycle produced
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: ClearOutcome,
    pub delivery: Delivery,
    pub status: CycleStatus,
}

/// Summary of a completed [`Runtime::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub exit: SchedulerExit,
    pub cycles: u64,
    /// Status of the most recent cycle, if any ran
    pub last_status: Option<CycleStatus>,
}

/// Runtime that schedules and runs clearing cycles
pub struct Runtime<R, N, C> {
    clearer: TempClearer<R>,
    reporter: ResultReporter<N>,
    scheduler: JobScheduler<C>,
    spec: ScheduleSpec,
    target_dir: PathBuf,
    last_status: Mutex<Option<CycleStatus>>,
}

impl<R, N, C> Runtime<R, N, C>
where
    R: EntryRemover,
    N: NotifyAdapter,
    C: Clock,
{
    /// Resolve the schedule from the current clock reading
    pub fn build(config: RuntimeConfig, deps: RuntimeDeps<R, N, C>) -> Result<Self, RuntimeError> {
        let reading = resolve_local_time(&deps.clock)?;
        let spec = config.schedule.build(reading)?;
        debug!(
            schedule = %spec,
            overrides = config.schedule.has_overrides(),
            mode = ?config.mode,
            "schedule resolved"
        );

        Ok(Self {
            clearer: TempClearer::new(deps.remover, config.clear),
            reporter: ResultReporter::new(deps.notify, config.report),
            scheduler: JobScheduler::new(deps.clock, config.mode),
            spec,
            target_dir: config.target_dir,
            last_status: Mutex::new(None),
        })
    }

    pub fn spec(&self) -> &ScheduleSpec {
        &self.spec
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn scheduler(&self) -> &JobScheduler<C> {
        &self.scheduler
    }

    pub fn last_status(&self) -> Option<CycleStatus> {
        *self.last_status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clear the target directory and report the outcome once
    pub async fn run_cycle(&self) -> CycleReport {
        let span = info_span!("cycle", dir = %self.target_dir.display());
        async {
            let outcome = self.clearer.clear(&self.target_dir).await;
            match serde_json::to_string(&outcome) {
                Ok(json) => debug!(outcome = %json, "clear outcome"),
                Err(e) => warn!(error = %e, "cannot serialize clear outcome"),
            }

            let status = CycleStatus::from(&outcome);
            let delivery = self.reporter.report(&outcome).await;
            info!(%status, failed = outcome.failed().len(), "cycle finished");

            *self.last_status.lock().unwrap_or_else(|e| e.into_inner()) = Some(status);
            CycleReport {
                outcome,
                delivery,
                status,
            }
        }
        .instrument(span)
        .await
    }

    /// Register the schedule and run cycles until `shutdown` completes or
    /// single-shot mode finishes
    pub async fn run(
        &self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<RunSummary, RuntimeError> {
        let first = self.scheduler.register(self.spec.clone())?;
        info!(schedule = %self.spec, first_fire = %first, dir = %self.target_dir.display(), "clear-temp armed");

        let exit = self.scheduler.run(move || self.run_cycle(), shutdown).await?;

        let summary = RunSummary {
            exit,
            cycles: self.scheduler.run_count(),
            last_status: self.last_status(),
        };
        info!(exit = ?summary.exit, cycles = summary.cycles, "clear-temp stopped");
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
