// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{NaiveDate, TimeDelta};
use ct_core::{FakeClock, LocalTime, ScheduleBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::time::Instant;

// 2026-03-15 is a Sunday
fn sunday_at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 15)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn noon_daily() -> ScheduleSpec {
    ScheduleBuilder::new()
        .time("12:00:00")
        .build(LocalTime::of(&sunday_at(0, 0, 0)))
        .unwrap()
}

#[derive(Clone)]
struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        Err(ClockError::BeforeEpoch("clock reset".to_string()))
    }
}

/// Wall clock driven by paused tokio time. With a `gap`, local time jumps
/// one hour forward on reaching it, as on a spring DST change.
#[derive(Clone)]
struct PausedClock {
    origin: Instant,
    start: NaiveDateTime,
    gap: Option<NaiveDateTime>,
}

impl PausedClock {
    fn new(start: NaiveDateTime) -> Self {
        Self {
            origin: Instant::now(),
            start,
            gap: None,
        }
    }

    fn springing_forward_at(mut self, gap: NaiveDateTime) -> Self {
        self.gap = Some(gap);
        self
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Clock for PausedClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        let local = self.start + TimeDelta::seconds(self.elapsed().as_secs() as i64);
        Ok(match self.gap {
            Some(gap) if local >= gap => local + TimeDelta::hours(1),
            _ => local,
        })
    }
}

#[test]
fn register_arms_the_next_fire_time() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);
    assert_eq!(scheduler.state(), JobState::Idle);

    let next = scheduler.register(noon_daily()).unwrap();

    assert_eq!(next, sunday_at(12, 0, 0));
    assert_eq!(scheduler.state(), JobState::Scheduled);
    assert_eq!(scheduler.next_fire(), Some(next));
}

#[test]
fn clock_failure_leaves_scheduler_idle() {
    let scheduler = JobScheduler::new(BrokenClock, RunMode::Daemon);

    let err = scheduler.register(noon_daily()).unwrap_err();

    assert!(matches!(err, SchedulerError::Clock(_)));
    assert_eq!(scheduler.state(), JobState::Idle);
    assert_eq!(scheduler.next_fire(), None);
}

#[tokio::test]
async fn fire_before_register_is_dropped() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);

    let result = scheduler.fire(async { 1 }).await;

    assert_eq!(result, FireResult::Dropped(JobState::Idle));
    assert_eq!(scheduler.run_count(), 0);
}

#[tokio::test]
async fn overlapping_firing_is_dropped() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();
    let runs = AtomicUsize::new(0);

    let slow = scheduler.fire(async {
        runs.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        "slow"
    });
    let second = scheduler.fire(async {
        runs.fetch_add(1, Ordering::SeqCst);
        "second"
    });
    let (first, second) = tokio::join!(slow, second);

    assert_eq!(first, FireResult::Completed("slow"));
    assert_eq!(second, FireResult::Dropped(JobState::Running));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.run_count(), 1);
    assert_eq!(scheduler.dropped_count(), 1);
    assert_eq!(scheduler.state(), JobState::Scheduled);
}

#[tokio::test]
async fn register_while_running_is_rejected() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();

    let slow = scheduler.fire(tokio::time::sleep(Duration::from_millis(50)));
    let reregister = async { scheduler.register(noon_daily()) };
    let (_, result) = tokio::join!(slow, reregister);

    assert!(matches!(
        result,
        Err(SchedulerError::InvalidState(JobState::Running))
    ));
}

#[tokio::test]
async fn daemon_mode_rearms_for_the_next_day() {
    let clock = FakeClock::new(sunday_at(11, 59, 59));
    let scheduler = JobScheduler::new(clock.clone(), RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();

    clock.set(sunday_at(12, 0, 0));
    let result = scheduler.fire(async {}).await;

    assert_eq!(result, FireResult::Completed(()));
    assert_eq!(scheduler.state(), JobState::Scheduled);
    assert_eq!(
        scheduler.next_fire(),
        Some(sunday_at(12, 0, 0) + TimeDelta::days(1))
    );
}

#[tokio::test]
async fn lagging_clock_does_not_refire_the_same_slot() {
    // Timer woke slightly early: the wall clock still reads before noon
    let clock = FakeClock::new(sunday_at(11, 59, 59));
    let scheduler = JobScheduler::new(clock, RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();

    scheduler.fire(async {}).await;

    assert_eq!(
        scheduler.next_fire(),
        Some(sunday_at(12, 0, 0) + TimeDelta::days(1))
    );
}

#[tokio::test]
async fn once_mode_terminates_after_first_pass() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Once);
    scheduler.register(noon_daily()).unwrap();

    scheduler.fire(async {}).await;

    assert_eq!(scheduler.state(), JobState::Terminated);
    assert_eq!(scheduler.next_fire(), None);
    assert_eq!(
        scheduler.fire(async {}).await,
        FireResult::Dropped(JobState::Terminated)
    );
}

#[tokio::test(start_paused = true)]
async fn run_once_fires_and_terminates() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(11, 59, 59)), RunMode::Once);
    scheduler.register(noon_daily()).unwrap();
    let runs = Arc::new(AtomicUsize::new(0));

    let exit = scheduler
        .run(
            || {
                let runs = runs.clone();
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            },
            std::future::pending(),
        )
        .await
        .unwrap();

    assert_eq!(exit, SchedulerExit::Terminated);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn run_daemon_fires_every_day_until_shutdown() {
    let clock = PausedClock::new(sunday_at(11, 59, 59));
    let scheduler = JobScheduler::new(clock.clone(), RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();
    let runs = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(Notify::new());

    let exit = scheduler
        .run(
            || {
                let runs = runs.clone();
                let stop = stop.clone();
                async move {
                    if runs.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                        stop.notify_one();
                    }
                }
            },
            stop.notified(),
        )
        .await
        .unwrap();

    assert_eq!(exit, SchedulerExit::Shutdown);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(scheduler.run_count(), 3);
    assert_eq!(scheduler.state(), JobState::Scheduled);
    assert_eq!(clock.elapsed(), Duration::from_secs(1 + 2 * 86_400));
    assert_eq!(
        scheduler.next_fire(),
        Some(sunday_at(12, 0, 0) + TimeDelta::days(3))
    );
}

#[tokio::test(start_paused = true)]
async fn fires_at_local_time_across_spring_forward() {
    // 2026-03-08 is a Sunday; local 02:00 jumps to 03:00
    let day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
    let start = day.and_hms_opt(1, 0, 0).unwrap();
    let clock = PausedClock::new(start).springing_forward_at(day.and_hms_opt(2, 0, 0).unwrap());
    let spec = ScheduleBuilder::new()
        .time("03:30:00")
        .build(LocalTime::of(&start))
        .unwrap();
    let scheduler = JobScheduler::new(clock.clone(), RunMode::Once);
    scheduler.register(spec).unwrap();
    let fired_at = Arc::new(Mutex::new(None));

    let exit = scheduler
        .run(
            || {
                let clock = clock.clone();
                let fired_at = fired_at.clone();
                async move {
                    *fired_at.lock().unwrap() = Some(clock.now().unwrap());
                }
            },
            std::future::pending(),
        )
        .await
        .unwrap();

    assert_eq!(exit, SchedulerExit::Terminated);
    assert_eq!(
        *fired_at.lock().unwrap(),
        Some(day.and_hms_opt(3, 30, 0).unwrap())
    );
    // Ninety real minutes pass between 01:00 and 03:30 on this day
    assert_eq!(clock.elapsed(), Duration::from_secs(90 * 60));
}

#[tokio::test(start_paused = true)]
async fn clock_stepped_forward_while_waiting_fires_early() {
    let clock = FakeClock::new(sunday_at(8, 0, 0));
    let scheduler = JobScheduler::new(clock.clone(), RunMode::Once);
    scheduler.register(noon_daily()).unwrap();
    let origin = Instant::now();

    let stepper = {
        let clock = clock.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(120)).await;
            clock.set(sunday_at(12, 0, 0));
            std::future::pending::<()>().await
        }
    };

    let exit = scheduler.run(|| async {}, stepper).await.unwrap();

    assert_eq!(exit, SchedulerExit::Terminated);
    assert_eq!(scheduler.run_count(), 1);
    assert!(origin.elapsed() <= Duration::from_secs(180));
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_fire_runs_nothing() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);
    scheduler.register(noon_daily()).unwrap();

    let exit = scheduler
        .run(|| async { unreachable!("must not fire") }, async {})
        .await
        .unwrap();

    assert_eq!(exit, SchedulerExit::Shutdown);
    assert_eq!(scheduler.run_count(), 0);
}

#[tokio::test]
async fn run_without_registration_is_exhausted() {
    let scheduler = JobScheduler::new(FakeClock::new(sunday_at(8, 0, 0)), RunMode::Daemon);

    let exit = scheduler
        .run(|| async {}, std::future::pending())
        .await
        .unwrap();

    assert_eq!(exit, SchedulerExit::Exhausted);
}
