//! Daily refresh service and its midnight timer.
//!
//! [`DailyService`] owns the persistence gate, the reminder scheduler and
//! the clock. `start` runs one refresh cycle and then arms a background
//! tokio task that sleeps until the next local midnight, runs the cycle
//! again and recomputes its next wake time. Every cycle's [`CycleReport`]
//! is sent on the report channel.
//!
//! The timer sleeps in bounded slices and re-reads the wall clock after
//! each one, so a suspended process or a clock adjustment is caught up on
//! the next slice instead of a full day later. Its wake time is always the
//! midnight after the last cycle ran, never one recomputed from a late
//! first poll, so a day change is never skipped.

use crate::config::DailyConfig;
use crate::content::{ContentCollection, ContentSelector, RandomSelector};
use crate::daily::{DailyOutcome, PersistenceGate};
use crate::error::Result;
use crate::scheduler::boundary::{delay_until, start_of_next_day};
use crate::scheduler::clock::Clock;
use crate::scheduler::notifier::Notifier;
use crate::scheduler::reminder::{ReminderScheduler, ReminderStatus};
use crate::store::KeyValueStore;
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Longest single sleep before the wall clock is checked again.
const WAKE_CHECK_SLICE: Duration = Duration::from_secs(15 * 60);

/// Where the service is in its day cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Constructed, or cycled without a midnight timer.
    Idle,
    /// The gate regenerated the item and the reminder is being armed.
    Refreshing,
    /// Midnight timer armed and waiting.
    Scheduled,
    /// Torn down; the timer is gone.
    Stopped,
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Wall-clock time the cycle ran at.
    pub at: DateTime<Local>,
    /// Gate result.
    pub outcome: DailyOutcome,
    /// Reminder result; `None` when the gate did not regenerate.
    pub reminder: Option<ReminderStatus>,
}

#[derive(Debug, Clone, Copy)]
struct CycleSnapshot {
    state: CycleState,
    next_wake: Option<DateTime<Local>>,
    last_run: Option<DateTime<Local>>,
}

struct Cycle {
    gate: PersistenceGate,
    reminders: ReminderScheduler,
    clock: Arc<dyn Clock>,
    report_tx: mpsc::UnboundedSender<CycleReport>,
    snapshot: Mutex<CycleSnapshot>,
}

impl Cycle {
    /// Gate pass, then a reminder only once the new record is persisted.
    async fn run(&self, now: DateTime<Local>) -> CycleReport {
        let outcome = self.gate.get_or_refresh(&now).await;
        self.update(|s| s.last_run = Some(now));

        let reminder = match &outcome {
            DailyOutcome::Refreshed {
                item,
                persisted: true,
            } => {
                self.update(|s| s.state = CycleState::Refreshing);
                let status = self.reminders.arm_daily_reminder(item, &now).await;
                self.update(|s| {
                    if s.state == CycleState::Refreshing {
                        s.state = if s.next_wake.is_some() {
                            CycleState::Scheduled
                        } else {
                            CycleState::Idle
                        };
                    }
                });
                Some(status)
            }
            DailyOutcome::Refreshed {
                persisted: false, ..
            } => {
                warn!("refreshed item was not saved, no reminder scheduled");
                Some(ReminderStatus::NotPersisted)
            }
            DailyOutcome::Cached(_) | DailyOutcome::Unavailable { .. } => None,
        };

        CycleReport {
            at: now,
            outcome,
            reminder,
        }
    }

    /// Returns `false` once nobody is listening for reports.
    fn publish(&self, report: CycleReport) -> bool {
        self.report_tx.send(report).is_ok()
    }

    fn update(&self, f: impl FnOnce(&mut CycleSnapshot)) {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut snapshot);
    }

    fn snapshot(&self) -> CycleSnapshot {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct MidnightTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl MidnightTimer {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Process-wide owner of the daily refresh cycle.
pub struct DailyService {
    cycle: Arc<Cycle>,
    timer: Mutex<Option<MidnightTimer>>,
}

impl DailyService {
    /// Assemble a service from its parts. Nothing runs until [`start`](Self::start).
    pub fn new(
        gate: PersistenceGate,
        reminders: ReminderScheduler,
        clock: Arc<dyn Clock>,
        report_tx: mpsc::UnboundedSender<CycleReport>,
    ) -> Self {
        Self {
            cycle: Arc::new(Cycle {
                gate,
                reminders,
                clock,
                report_tx,
                snapshot: Mutex::new(CycleSnapshot {
                    state: CycleState::Idle,
                    next_wake: None,
                    last_run: None,
                }),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Build a service from config: loads the collection (or the bundled
    /// sample) and seeds the selector when configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured collection cannot be loaded.
    pub fn from_config(
        config: &DailyConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        report_tx: mpsc::UnboundedSender<CycleReport>,
    ) -> Result<Self> {
        let collection = match &config.content.collection_path {
            Some(path) => ContentCollection::from_file(path)?,
            None => ContentCollection::bundled()?,
        };
        info!(
            groups = collection.groups.len(),
            items = collection.leaf_count(),
            "content collection loaded"
        );

        let collection = Arc::new(collection);
        let selector: Arc<dyn ContentSelector> = match config.content.seed {
            Some(seed) => Arc::new(RandomSelector::with_seed(collection, seed)),
            None => Arc::new(RandomSelector::new(collection)),
        };

        let gate = PersistenceGate::new(store, selector, config.storage.key.clone());
        let reminders = ReminderScheduler::new(notifier, config.reminder.clone());
        Ok(Self::new(gate, reminders, clock, report_tx))
    }

    /// Run a cycle now, then (re)arm the midnight timer.
    ///
    /// Safe to call again, e.g. on remount: the previous timer is cancelled
    /// before the new one is armed.
    pub async fn start(&self) -> CycleReport {
        let report = self.refresh_now().await;
        self.arm_midnight_timer();
        report
    }

    /// Run one cycle at the clock's current time without touching the timer.
    pub async fn refresh_now(&self) -> CycleReport {
        let report = self.cycle.run(self.cycle.clock.now()).await;
        if !self.cycle.publish(report.clone()) {
            debug!("cycle report channel closed");
        }
        report
    }

    /// Cancel any running midnight timer and arm a fresh one.
    ///
    /// The timer wakes at the midnight following the last cycle. When that
    /// midnight has already passed the cycle runs as soon as the task starts.
    pub fn arm_midnight_timer(&self) {
        let mut slot = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            debug!("replacing existing midnight timer");
            previous.stop();
        }

        let cancel = CancellationToken::new();
        let last_run = self
            .cycle
            .snapshot()
            .last_run
            .unwrap_or_else(|| self.cycle.clock.now());
        let wake = start_of_next_day(&last_run);
        self.cycle.update(|s| {
            s.next_wake = Some(wake);
            s.state = CycleState::Scheduled;
        });

        let handle = tokio::spawn(midnight_loop(Arc::clone(&self.cycle), wake, cancel.clone()));
        *slot = Some(MidnightTimer { cancel, handle });
        info!(next_wake = %wake, "midnight timer armed");
    }

    /// Stop the midnight timer. Outstanding reminders are left in place.
    pub fn shutdown(&self) {
        if let Some(timer) = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take() {
            timer.stop();
            info!("daily service stopped");
        }
        self.cycle.update(|s| {
            s.next_wake = None;
            s.state = CycleState::Stopped;
        });
    }

    #[must_use]
    pub fn state(&self) -> CycleState {
        self.cycle.snapshot().state
    }

    /// Wall-clock time the midnight timer will next run the cycle.
    #[must_use]
    pub fn next_wake(&self) -> Option<DateTime<Local>> {
        self.cycle.snapshot().next_wake
    }

    #[must_use]
    pub fn is_timer_armed(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    pub fn gate(&self) -> &PersistenceGate {
        &self.cycle.gate
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.cycle.reminders
    }
}

impl Drop for DailyService {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take() {
            timer.stop();
        }
    }
}

async fn midnight_loop(cycle: Arc<Cycle>, mut wake: DateTime<Local>, cancel: CancellationToken) {
    loop {
        debug!(next_wake = %wake, "midnight timer sleeping");

        loop {
            let remaining = delay_until(&cycle.clock.now(), &wake);
            if remaining.is_zero() {
                break;
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("midnight timer cancelled");
                    return;
                }
                () = tokio::time::sleep(remaining.min(WAKE_CHECK_SLICE)) => {}
            }
        }

        let report = cycle.run(cycle.clock.now()).await;
        wake = start_of_next_day(&report.at);
        cycle.update(|s| s.next_wake = Some(wake));

        if let DailyOutcome::Unavailable { .. } = report.outcome {
            warn!("midnight refresh produced no content");
        }
        if !cycle.publish(report) {
            debug!("cycle report channel closed, stopping midnight timer");
            return;
        }
    }
}
