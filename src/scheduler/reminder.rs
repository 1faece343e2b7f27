//! Next-morning reminder arming.
//!
//! Every arm first cancels whatever the notifier has outstanding, so at most
//! one daily reminder exists at a time. Failures never propagate; they are
//! logged and reported as a [`ReminderStatus`].

use crate::config::ReminderConfig;
use crate::content::ContentItem;
use crate::scheduler::boundary::next_day_at;
use crate::scheduler::notifier::{Notifier, Permission, ReminderRequest, ScheduledReminder};
use chrono::{DateTime, Local, NaiveTime};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// What happened to the push reminder for a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderStatus {
    /// Reminder accepted by the notifier.
    Scheduled(ScheduledReminder),
    /// Reminders are turned off in config.
    Disabled,
    /// The user or platform refused notification permission.
    PermissionDenied,
    /// Cancelling or scheduling failed.
    Failed(String),
    /// The refreshed item never reached the store, so no reminder quotes it.
    NotPersisted,
}

impl ReminderStatus {
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled(reminder) => write!(
                f,
                "reminder set for {}",
                reminder.request.fire_at.format("%Y-%m-%d %H:%M")
            ),
            Self::Disabled => f.write_str("reminders disabled"),
            Self::PermissionDenied => f.write_str("notification permission denied"),
            Self::Failed(msg) => write!(f, "reminder failed: {msg}"),
            Self::NotPersisted => f.write_str("reminder skipped: verse was not saved"),
        }
    }
}

/// Arms the one-shot reminder that follows each content refresh.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    config: ReminderConfig,
    outstanding: Mutex<Option<ScheduledReminder>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, config: ReminderConfig) -> Self {
        Self {
            notifier,
            config,
            outstanding: Mutex::new(None),
        }
    }

    /// Local time of day the reminder fires at.
    #[must_use]
    pub fn time_of_day(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.config.hour), u32::from(self.config.minute), 0)
            .unwrap_or_else(|| {
                warn!(
                    hour = self.config.hour,
                    minute = self.config.minute,
                    "invalid reminder time, using 08:00"
                );
                NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
            })
    }

    /// Reminder currently believed to be outstanding.
    #[must_use]
    pub fn outstanding(&self) -> Option<ScheduledReminder> {
        self.outstanding
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Build the reminder request for `item` relative to `now`.
    #[must_use]
    pub fn build_request(&self, item: &ContentItem, now: &DateTime<Local>) -> ReminderRequest {
        ReminderRequest {
            title: self.config.title.clone(),
            body: format!("{} - {}", item.text, item.reference),
            fire_at: next_day_at(now, self.time_of_day()),
        }
    }

    /// Replace any outstanding reminder with one for `item`, due tomorrow.
    ///
    /// Cancellation always runs first. If it fails nothing new is scheduled,
    /// since the old reminder may still be live.
    pub async fn arm_daily_reminder(
        &self,
        item: &ContentItem,
        now: &DateTime<Local>,
    ) -> ReminderStatus {
        if let Err(e) = self.notifier.cancel_all().await {
            warn!("cannot cancel previous reminders: {e}");
            return ReminderStatus::Failed(e.to_string());
        }
        self.set_outstanding(None);

        if !self.config.enabled {
            debug!("reminders disabled, skipping");
            return ReminderStatus::Disabled;
        }

        match self.notifier.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                info!("notification permission denied, skipping reminder");
                return ReminderStatus::PermissionDenied;
            }
            Err(e) => {
                warn!("notification permission request failed, skipping reminder: {e}");
                return ReminderStatus::PermissionDenied;
            }
        }

        let request = self.build_request(item, now);
        match self.notifier.schedule_one_shot(&request).await {
            Ok(handle) => {
                info!(
                    %handle,
                    fire_at = %request.fire_at,
                    reference = %item.reference,
                    "daily reminder scheduled"
                );
                let reminder = ScheduledReminder { handle, request };
                self.set_outstanding(Some(reminder.clone()));
                ReminderStatus::Scheduled(reminder)
            }
            Err(e) => {
                warn!("cannot schedule daily reminder: {e}");
                ReminderStatus::Failed(e.to_string())
            }
        }
    }

    fn set_outstanding(&self, reminder: Option<ScheduledReminder>) {
        *self.outstanding.lock().unwrap_or_else(|e| e.into_inner()) = reminder;
    }
}
