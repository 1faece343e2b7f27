//! Next-boundary scheduling.
//!
//! Computes local day boundaries, arms the next-morning reminder after each
//! refresh, and runs the midnight timer that drives the daily cycle.

pub mod boundary;
pub mod clock;
pub mod notifier;
pub mod reminder;
pub mod runner;

pub use boundary::{delay_until_next_day, next_day_at, start_of_next_day};
pub use clock::{Clock, SystemClock};
pub use notifier::{
    LogNotifier, NoopNotifier, Notifier, Permission, ReminderHandle, ReminderRequest,
    ScheduledReminder,
};
pub use reminder::{ReminderScheduler, ReminderStatus};
pub use runner::{CycleReport, CycleState, DailyService};
