//! Notification facility used for next-morning reminders.
//!
//! [`Notifier`] is the capability the reminder scheduler drives: ask for
//! permission, cancel everything outstanding, schedule a one-shot reminder.
//! [`LogNotifier`] delivers reminders as tracing events from an in-process
//! timer, which is what the headless binary uses. [`NoopNotifier`] refuses
//! permission so only the content refresh runs.

use crate::error::{Result, VerseError};
use crate::scheduler::boundary::delay_until;
use crate::scheduler::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Content and timing of a one-shot reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Local>,
}

/// Opaque identifier of a scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderHandle(String);

impl ReminderHandle {
    /// Fresh random handle.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReminderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reminder the notifier accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub handle: ReminderHandle,
    pub request: ReminderRequest,
}

/// Platform notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Ask the user (or platform) for permission to post reminders.
    async fn request_permission(&self) -> Result<Permission>;

    /// Cancel every reminder this notifier has scheduled. Idempotent.
    async fn cancel_all(&self) -> Result<()>;

    /// Schedule a reminder to fire once at `request.fire_at`.
    async fn schedule_one_shot(&self, request: &ReminderRequest) -> Result<ReminderHandle>;
}

/// Notifier that refuses permission; reminders are never scheduled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn request_permission(&self) -> Result<Permission> {
        Ok(Permission::Denied)
    }

    async fn cancel_all(&self) -> Result<()> {
        Ok(())
    }

    async fn schedule_one_shot(&self, _request: &ReminderRequest) -> Result<ReminderHandle> {
        Err(VerseError::Notification(
            "notifications are disabled".to_owned(),
        ))
    }
}

/// Delivers reminders as `info` tracing events when they come due.
///
/// Each scheduled reminder is a spawned tokio task sleeping until its fire
/// time, measured on the same clock the service runs on. `cancel_all`
/// aborts every pending task.
pub struct LogNotifier {
    clock: Arc<dyn Clock>,
    pending: Mutex<Vec<(ReminderHandle, JoinHandle<()>)>>,
}

impl LogNotifier {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Number of reminders scheduled and not yet delivered or cancelled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|(_, task)| !task.is_finished());
        pending.len()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn request_permission(&self) -> Result<Permission> {
        Ok(Permission::Granted)
    }

    async fn cancel_all(&self) -> Result<()> {
        let drained: Vec<_> = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.drain(..).collect()
        };
        for (handle, task) in drained {
            if !task.is_finished() {
                debug!(%handle, "cancelling pending reminder");
            }
            task.abort();
        }
        Ok(())
    }

    async fn schedule_one_shot(&self, request: &ReminderRequest) -> Result<ReminderHandle> {
        let handle = ReminderHandle::generate();
        let delay = delay_until(&self.clock.now(), &request.fire_at);
        let request = request.clone();
        let task_handle = handle.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(
                handle = %task_handle,
                title = %request.title,
                "reminder: {}",
                request.body
            );
        });

        debug!(%handle, delay_secs = delay.as_secs(), "reminder scheduled");
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((handle.clone(), task));
        Ok(handle)
    }
}
