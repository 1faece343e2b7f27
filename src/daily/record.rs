//! The persisted content-of-the-day record.

use crate::content::ContentItem;
use crate::error::Result;
use crate::store::KeyValueStore;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Content of the day plus the calendar day it was generated on.
///
/// Wire format: `{"item":{"reference":"..","text":".."},"dateStamp":"YYYY-MM-DD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub item: ContentItem,
    pub date_stamp: String,
}

impl DailyRecord {
    pub fn new(item: ContentItem, date_stamp: impl Into<String>) -> Self {
        Self {
            item,
            date_stamp: date_stamp.into(),
        }
    }

    /// Whether this record was generated on the calendar day of `now`.
    pub fn is_for_day<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.date_stamp == calendar_date_string(now)
    }
}

/// Calendar-day stamp (`YYYY-MM-DD`) of `now` in its own time zone.
pub fn calendar_date_string<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// Long display form, e.g. `Friday, April 11, 2025`.
pub fn display_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    now.date_naive().format("%A, %B %-d, %Y").to_string()
}

/// Read the record stored under `key`.
///
/// # Errors
///
/// Propagates store failures and returns [`crate::VerseError::Json`] for a
/// value that does not decode as a record.
pub async fn load_record(store: &dyn KeyValueStore, key: &str) -> Result<Option<DailyRecord>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Replace the record stored under `key`.
///
/// # Errors
///
/// Propagates store failures.
pub async fn save_record(store: &dyn KeyValueStore, key: &str, record: &DailyRecord) -> Result<()> {
    let json = serde_json::to_string(record)?;
    store.set(key, json).await
}
