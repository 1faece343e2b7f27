use crate::helpers::{FixedClock, TrackingNotifier, april, single_verse_collection};
use daily_verse::config::ReminderConfig;
use daily_verse::content::RandomSelector;
use daily_verse::daily::load_record;
use daily_verse::scheduler::{NoopNotifier, ReminderScheduler};
use daily_verse::{
    ContentItem, CycleState, DailyConfig, DailyOutcome, DailyService, KeyValueStore, MemoryStore,
    PersistenceGate, ReminderStatus,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn empty_store_single_verse_scenario() {
    let store = Arc::new(MemoryStore::new());
    let selector = Arc::new(RandomSelector::new(Arc::new(single_verse_collection(
        "Genesis",
        "Test verse",
    ))));
    let gate = PersistenceGate::new(store.clone(), selector, "dailyVerse");

    let outcome = gate.get_or_refresh(&april(11, 9, 30)).await;
    assert_eq!(
        outcome,
        DailyOutcome::Refreshed {
            item: ContentItem::new("Genesis 1:1", "Test verse"),
            persisted: true,
        }
    );

    let record = load_record(store.as_ref(), "dailyVerse")
        .await
        .expect("readable record")
        .expect("record stored");
    assert_eq!(record.date_stamp, "2025-04-11");
    assert_eq!(record.item.text, "Test verse");

    let raw = store
        .get("dailyVerse")
        .await
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["dateStamp"], "2025-04-11");
    assert_eq!(json["item"]["reference"], "Genesis 1:1");
}

#[tokio::test]
async fn successive_arms_leave_a_single_reminder() {
    let notifier = Arc::new(TrackingNotifier::default());
    let scheduler = ReminderScheduler::new(notifier.clone(), ReminderConfig::default());
    let item = ContentItem::new("John 3:16", "For God so loved the world");

    scheduler.arm_daily_reminder(&item, &april(11, 10, 0)).await;
    scheduler.arm_daily_reminder(&item, &april(11, 10, 5)).await;

    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].fire_at, april(12, 8, 0));
}

#[tokio::test]
async fn denied_permission_keeps_the_cycle_running() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let service = DailyService::from_config(
        &DailyConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(NoopNotifier),
        Arc::new(FixedClock::at(april(11, 7, 0))),
        tx,
    )
    .expect("service");

    let report = service.start().await;
    assert!(report.outcome.is_refreshed());
    assert_eq!(report.reminder, Some(ReminderStatus::PermissionDenied));
    assert!(service.is_timer_armed());
    assert_eq!(service.state(), CycleState::Scheduled);
    assert_eq!(service.next_wake(), Some(april(12, 0, 0)));

    service.shutdown();
    assert!(!service.is_timer_armed());
}

#[tokio::test]
async fn day_change_between_manual_refreshes_regenerates() {
    let clock = Arc::new(FixedClock::at(april(11, 20, 0)));
    let notifier = Arc::new(TrackingNotifier::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let service = DailyService::from_config(
        &DailyConfig::default(),
        Arc::new(MemoryStore::new()),
        notifier.clone(),
        clock.clone(),
        tx,
    )
    .expect("service");

    let first = service.refresh_now().await;
    let same_day = service.refresh_now().await;
    clock.set(april(12, 6, 0));
    let next_day = service.refresh_now().await;

    assert!(first.outcome.is_refreshed());
    assert!(!same_day.outcome.is_refreshed());
    assert!(same_day.reminder.is_none());
    assert!(next_day.outcome.is_refreshed());

    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].fire_at, april(13, 8, 0));

    let mut reports = 0;
    while rx.try_recv().is_ok() {
        reports += 1;
    }
    assert_eq!(reports, 3);
}
