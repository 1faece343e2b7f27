//! CLI binary for the daily verse service.
//!
//! Diagnostic output goes to stderr (and optionally a daily-rolling log
//! file); verses are printed to stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use daily_verse::config::LoggingConfig;
use daily_verse::daily::display_date;
use daily_verse::scheduler::{Clock, LogNotifier, NoopNotifier, SystemClock};
use daily_verse::{
    CycleReport, DailyConfig, DailyService, JsonFileStore, KeyValueStore, app_dirs, session,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Verse of the day, refreshed at local midnight.
#[derive(Parser)]
#[command(name = "daily-verse", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Keep running: print each day's verse and schedule morning reminders.
    Run,

    /// Print today's verse and exit.
    Show,

    /// Clear stored session keys.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(app_dirs::config_file);
    let config = DailyConfig::load_or_default(&config_path)?;
    let _log_guard = init_tracing(&config.logging);

    let store: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::new(config.storage.resolved_state_file()));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config, store).await,
        Command::Show => show(config, store).await,
        Command::Logout => logout(config, store).await,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let mut file_error = None;
    let (file_layer, guard) = if logging.file {
        match file_appender(&app_dirs::logs_dir()) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            Err(e) => {
                file_error = Some(e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        warn!("file logging disabled, logging to stderr only: {e}");
    }
    guard
}

fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("daily-verse.log")
        .build(dir)
        .with_context(|| format!("cannot open log file in {}", dir.display()))
}

async fn run(config: DailyConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = DailyService::from_config(
        &config,
        store,
        Arc::new(LogNotifier::new(Arc::clone(&clock))),
        clock,
        report_tx,
    )?;

    service.start().await;
    if let Some(wake) = service.next_wake() {
        info!(next_wake = %wake, "daily-verse running, Ctrl+C to stop");
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            report = report_rx.recv() => match report {
                Some(report) => print_report(&report),
                None => break,
            },
            _ = &mut ctrl_c => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    service.shutdown();
    Ok(())
}

async fn show(config: DailyConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let (report_tx, _report_rx) = mpsc::unbounded_channel();
    // One-shot process: a reminder scheduled here would die with it.
    let service = DailyService::from_config(
        &config,
        store,
        Arc::new(NoopNotifier),
        Arc::new(SystemClock),
        report_tx,
    )?;

    let report = service.refresh_now().await;
    if report.outcome.item().is_none() {
        anyhow::bail!("no verse available; check the content collection");
    }
    print_report(&CycleReport {
        reminder: None,
        ..report
    });
    Ok(())
}

async fn logout(config: DailyConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let removed = session::logout(store.as_ref(), &config.session.keys).await?;
    println!("cleared {removed} session key(s)");
    Ok(())
}

fn print_report(report: &CycleReport) {
    match report.outcome.item() {
        Some(item) => {
            println!("{}", display_date(&report.at));
            println!("{}", item.text);
            println!("  {}", item.reference);
        }
        None => eprintln!("no verse available for {}", display_date(&report.at)),
    }
    if let Some(status) = &report.reminder {
        println!("({status})");
    }
}
