//! Persistence gate: reuse today's record or regenerate it.

use crate::content::{ContentItem, ContentSelector};
use crate::daily::record::{DailyRecord, calendar_date_string, load_record, save_record};
use crate::store::KeyValueStore;
use chrono::{DateTime, TimeZone};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of one gate pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyOutcome {
    /// Today's record already existed; nothing was written.
    Cached(ContentItem),
    /// A new item was selected for today.
    Refreshed {
        item: ContentItem,
        /// `false` when the store write failed; the item is still usable.
        persisted: bool,
    },
    /// The selector produced nothing. The stored record, if any, is untouched.
    Unavailable {
        /// Last stored item even though it belongs to an earlier day.
        stale: Option<ContentItem>,
    },
}

impl DailyOutcome {
    /// Item to display, if any.
    #[must_use]
    pub fn item(&self) -> Option<&ContentItem> {
        match self {
            Self::Cached(item) | Self::Refreshed { item, .. } => Some(item),
            Self::Unavailable { stale } => stale.as_ref(),
        }
    }

    #[must_use]
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed { .. })
    }
}

/// Decides between cache hit and regeneration for the current day.
///
/// Passes are serialized, so concurrent callers on the same day see one
/// regeneration at most. The last record produced is also kept in memory:
/// when the store cannot be written (or read back), same-day calls still
/// return the same item instead of regenerating.
pub struct PersistenceGate {
    store: Arc<dyn KeyValueStore>,
    selector: Arc<dyn ContentSelector>,
    key: String,
    last: Mutex<Option<DailyRecord>>,
}

impl PersistenceGate {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        selector: Arc<dyn ContentSelector>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            selector,
            key: key.into(),
            last: Mutex::new(None),
        }
    }

    /// Storage key holding the daily record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return today's item, regenerating and persisting it on a day change.
    pub async fn get_or_refresh<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailyOutcome {
        let mut last = self.last.lock().await;
        let today = calendar_date_string(now);

        let stored = match load_record(self.store.as_ref(), &self.key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, "daily record unreadable, treating as miss: {e}");
                None
            }
        };

        if let Some(record) = stored.as_ref().filter(|r| r.date_stamp == today) {
            debug!(date = %today, reference = %record.item.reference, "daily record cache hit");
            *last = Some(record.clone());
            return DailyOutcome::Cached(record.item.clone());
        }

        if let Some(record) = last.as_ref().filter(|r| r.date_stamp == today) {
            debug!(date = %today, "daily record served from memory");
            return DailyOutcome::Cached(record.item.clone());
        }

        let Some(item) = self.selector.select() else {
            warn!(date = %today, "content selector returned nothing, skipping refresh");
            let stale = stored.map(|r| r.item).or_else(|| last.as_ref().map(|r| r.item.clone()));
            return DailyOutcome::Unavailable { stale };
        };

        let record = DailyRecord::new(item.clone(), today);
        let persisted = match save_record(self.store.as_ref(), &self.key, &record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, "cannot persist daily record: {e}");
                false
            }
        };
        info!(
            date = %record.date_stamp,
            reference = %item.reference,
            persisted,
            "daily content refreshed"
        );
        *last = Some(record);

        DailyOutcome::Refreshed { item, persisted }
    }

    /// Stored record without triggering a refresh.
    pub async fn stored(&self) -> Option<DailyRecord> {
        match load_record(self.store.as_ref(), &self.key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, "daily record unreadable: {e}");
                None
            }
        }
    }
}
