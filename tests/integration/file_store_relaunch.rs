use crate::helpers::{FixedClock, TrackingNotifier, april};
use daily_verse::scheduler::NoopNotifier;
use daily_verse::{
    DailyConfig, DailyService, JsonFileStore, KeyValueStore, VerseError, session,
};
use std::sync::Arc;
use tokio::sync::mpsc;

fn config_in(dir: &std::path::Path) -> DailyConfig {
    let mut config = DailyConfig::default();
    config.storage.state_file = Some(dir.join("store.json"));
    config
}

fn service(config: &DailyConfig, clock: Arc<FixedClock>) -> DailyService {
    let store = Arc::new(JsonFileStore::new(config.storage.resolved_state_file()));
    let (tx, _rx) = mpsc::unbounded_channel();
    DailyService::from_config(config, store, Arc::new(TrackingNotifier::default()), clock, tx)
        .expect("service")
}

#[tokio::test]
async fn relaunch_on_same_day_reuses_persisted_verse() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_in(temp.path());

    let first = service(&config, Arc::new(FixedClock::at(april(11, 8, 0))))
        .refresh_now()
        .await;
    let store_path = config.storage.resolved_state_file();
    let written = std::fs::read_to_string(&store_path).expect("store written");

    let relaunched = service(&config, Arc::new(FixedClock::at(april(11, 21, 0))))
        .refresh_now()
        .await;

    assert!(first.outcome.is_refreshed());
    assert!(!relaunched.outcome.is_refreshed());
    assert_eq!(relaunched.outcome.item(), first.outcome.item());
    assert_eq!(std::fs::read_to_string(&store_path).unwrap(), written);
}

#[tokio::test]
async fn relaunch_next_day_replaces_the_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_in(temp.path());

    service(&config, Arc::new(FixedClock::at(april(11, 8, 0))))
        .refresh_now()
        .await;
    let next = service(&config, Arc::new(FixedClock::at(april(12, 8, 0))))
        .refresh_now()
        .await;
    assert!(next.outcome.is_refreshed());

    let raw = std::fs::read_to_string(config.storage.resolved_state_file()).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record: serde_json::Value =
        serde_json::from_str(entries["dailyVerse"].as_str().expect("record string")).unwrap();
    assert_eq!(record["dateStamp"], "2025-04-12");
}

#[tokio::test]
async fn malformed_collection_file_fails_service_construction() {
    let temp = tempfile::tempdir().expect("tempdir");
    let collection_path = temp.path().join("verses.json");
    std::fs::write(
        &collection_path,
        r#"{"books":[{"name":"Obadiah","chapters":[]}]}"#,
    )
    .unwrap();

    let mut config = config_in(temp.path());
    config.content.collection_path = Some(collection_path);

    let (tx, _rx) = mpsc::unbounded_channel();
    let result = DailyService::from_config(
        &config,
        Arc::new(JsonFileStore::new(config.storage.resolved_state_file())),
        Arc::new(NoopNotifier),
        Arc::new(FixedClock::at(april(11, 8, 0))),
        tx,
    );
    assert!(matches!(result, Err(VerseError::Collection(_))));
}

#[tokio::test]
async fn seeded_config_picks_reproducibly() {
    let temp_a = tempfile::tempdir().expect("tempdir");
    let temp_b = tempfile::tempdir().expect("tempdir");
    let mut config_a = config_in(temp_a.path());
    let mut config_b = config_in(temp_b.path());
    config_a.content.seed = Some(2025);
    config_b.content.seed = Some(2025);

    let a = service(&config_a, Arc::new(FixedClock::at(april(11, 8, 0))))
        .refresh_now()
        .await;
    let b = service(&config_b, Arc::new(FixedClock::at(april(11, 8, 0))))
        .refresh_now()
        .await;
    assert_eq!(a.outcome.item(), b.outcome.item());
}

#[tokio::test]
async fn logout_leaves_the_daily_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_in(temp.path());
    let store = JsonFileStore::new(config.storage.resolved_state_file());
    store.set("userToken", "secret".to_owned()).await.unwrap();

    service(&config, Arc::new(FixedClock::at(april(11, 8, 0))))
        .refresh_now()
        .await;

    let removed = session::logout(&store, &config.session.keys).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.get("userToken").await.unwrap().is_none());
    assert!(store.get("dailyVerse").await.unwrap().is_some());
}
