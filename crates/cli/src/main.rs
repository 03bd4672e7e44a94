// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! clear-temp - clears the temp directory on a recurring schedule

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod adapters;
mod args;
mod error;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use ct_engine::{CycleStatus, RunSummary, SchedulerExit};
use std::future::Future;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::args::Cli;
use crate::error::CliError;

/// Exit code for bad arguments and other startup errors
const EXIT_STARTUP_FAILED: u8 = 1;

/// Exit code for a single-shot cycle that could not clear everything
const EXIT_CLEAR_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Output errors are ignored; there is nowhere left to report them
            let _ = e.print();
            return ExitCode::from(parse_exit_code(e.kind()));
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::from(EXIT_STARTUP_FAILED)
        }
    }
}

/// Help exits 0; any other argument error is a startup failure
fn parse_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_STARTUP_FAILED,
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let options = cli.resolve()?;

    if options.version {
        println!("clear-temp version: v{}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(&options.log_level)?;

    let runtime = adapters::make_runtime(options.config, options.notify).map_err(CliError::from)?;
    info!(
        schedule = %runtime.spec(),
        dir = %runtime.target_dir().display(),
        "clear-temp starting"
    );

    let shutdown = shutdown_signal().context("cannot install signal handlers")?;
    let summary = runtime.run(shutdown).await.map_err(CliError::from)?;
    Ok(ExitCode::from(exit_code(&summary)))
}

fn exit_code(summary: &RunSummary) -> u8 {
    match (summary.exit, summary.last_status) {
        (SchedulerExit::Terminated, Some(CycleStatus::Failed)) => EXIT_CLEAR_FAILED,
        (SchedulerExit::Exhausted, _) => {
            warn!("schedule has no further fire time");
            0
        }
        _ => 0,
    }
}

fn setup_logging(filter: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(filter).map_err(|e| CliError::invalid_log_filter(filter, e))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .try_init()?;

    Ok(())
}

/// Install SIGINT and SIGTERM handlers. The returned future completes on
/// the first signal received.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("received SIGINT, shutting down"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    })
}
