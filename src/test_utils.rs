//! Shared test doubles used across unit test modules.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::content::{ContentItem, ContentSelector};
use crate::error::{Result, VerseError};
use crate::scheduler::clock::Clock;
use crate::scheduler::notifier::{Notifier, Permission, ReminderHandle, ReminderRequest};
use crate::store::{KeyValueStore, MemoryStore};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory store that counts writes.
#[derive(Default)]
pub(crate) struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        self.inner.remove(key).await
    }
}

/// Store whose every operation fails.
pub(crate) struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(VerseError::Storage("read refused".to_owned()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<()> {
        Err(VerseError::Storage("write refused".to_owned()))
    }

    async fn remove(&self, _key: &str) -> Result<bool> {
        Err(VerseError::Storage("remove refused".to_owned()))
    }
}

/// Selector that never produces content.
pub(crate) struct NothingSelector;

impl ContentSelector for NothingSelector {
    fn select(&self) -> Option<ContentItem> {
        None
    }
}

/// Selector yielding the given texts in order, then nothing.
pub(crate) struct SequenceSelector {
    texts: Mutex<VecDeque<String>>,
}

impl SequenceSelector {
    pub(crate) fn new<const N: usize>(texts: [&str; N]) -> Self {
        Self {
            texts: Mutex::new(texts.iter().map(|t| (*t).to_owned()).collect()),
        }
    }
}

impl ContentSelector for SequenceSelector {
    fn select(&self) -> Option<ContentItem> {
        let text = self.texts.lock().unwrap().pop_front()?;
        Some(ContentItem::new("Test 1:1", text))
    }
}

/// Notifier call, in the order received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotifierCall {
    RequestPermission,
    CancelAll,
    Schedule,
}

/// Notifier that records calls and tracks active reminders.
pub(crate) struct RecordingNotifier {
    permission: Permission,
    fail_cancel: bool,
    fail_schedule: bool,
    calls: Mutex<Vec<NotifierCall>>,
    active: Mutex<Vec<(ReminderHandle, ReminderRequest)>>,
    scheduled_total: AtomicUsize,
}

impl RecordingNotifier {
    fn with_permission(permission: Permission) -> Self {
        Self {
            permission,
            fail_cancel: false,
            fail_schedule: false,
            calls: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
            scheduled_total: AtomicUsize::new(0),
        }
    }

    pub(crate) fn granting() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub(crate) fn denying() -> Self {
        Self::with_permission(Permission::Denied)
    }

    pub(crate) fn failing_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }

    pub(crate) fn failing_schedule(mut self) -> Self {
        self.fail_schedule = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    pub(crate) fn scheduled_total(&self) -> usize {
        self.scheduled_total.load(Ordering::SeqCst)
    }

    fn record(&self, call: NotifierCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn request_permission(&self) -> Result<Permission> {
        self.record(NotifierCall::RequestPermission);
        Ok(self.permission)
    }

    async fn cancel_all(&self) -> Result<()> {
        self.record(NotifierCall::CancelAll);
        if self.fail_cancel {
            return Err(VerseError::Notification("cancel refused".to_owned()));
        }
        self.active.lock().unwrap().clear();
        Ok(())
    }

    async fn schedule_one_shot(&self, request: &ReminderRequest) -> Result<ReminderHandle> {
        self.record(NotifierCall::Schedule);
        if self.fail_schedule {
            return Err(VerseError::Notification("schedule refused".to_owned()));
        }
        let handle = ReminderHandle::generate();
        self.active
            .lock()
            .unwrap()
            .push((handle.clone(), request.clone()));
        self.scheduled_total.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }
}

/// Wall clock that advances with tokio's (pausable) clock.
///
/// Reads `base + jumps + tokio elapsed`, so `start_paused` tests move the
/// wall clock exactly as far as the runtime auto-advances.
pub(crate) struct PausedClock {
    base: DateTime<Local>,
    origin: tokio::time::Instant,
    jumped: Mutex<chrono::Duration>,
}

impl PausedClock {
    pub(crate) fn starting_at(base: DateTime<Local>) -> Self {
        Self {
            base,
            origin: tokio::time::Instant::now(),
            jumped: Mutex::new(chrono::Duration::zero()),
        }
    }

    /// Tokio time elapsed since construction (excludes jumps).
    pub(crate) fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Move the wall clock without advancing tokio time.
    pub(crate) fn jump(&self, by: chrono::Duration) {
        *self.jumped.lock().unwrap() += by;
    }
}

impl Clock for PausedClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.elapsed()).unwrap();
        self.base + *self.jumped.lock().unwrap() + elapsed
    }
}
