//! Daily verse: content-of-the-day refresh with next-morning reminders.
//!
//! # Architecture
//!
//! - **Content selector** ([`content`]): picks one item from a nested
//!   book → chapter → verse collection, uniformly at each level.
//! - **Persistence gate** ([`daily`]): reuses the stored record when it was
//!   generated today, otherwise selects, persists and reports a new one.
//! - **Next-boundary scheduler** ([`scheduler`]): arms a one-shot reminder
//!   for the next morning after every refresh and runs a midnight timer
//!   that repeats the cycle for the lifetime of the process.
//!
//! Member contact numbers are normalized to E.164 by [`phone`].
//!
//! Storage ([`store`]) and notifications ([`scheduler::Notifier`]) are
//! injected capabilities; [`scheduler::DailyService`] owns one of each.

pub mod app_dirs;
pub mod config;
pub mod content;
pub mod daily;
pub mod error;
pub mod phone;
pub mod scheduler;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::DailyConfig;
pub use content::{ContentCollection, ContentItem};
pub use daily::{DailyOutcome, DailyRecord, PersistenceGate};
pub use error::{Result, VerseError};
pub use scheduler::{CycleReport, CycleState, DailyService, ReminderScheduler, ReminderStatus};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
