use std::fs;
use std::sync::{Arc, Mutex};

use diemso_engine::player::{seat_players, PlayerId};
use diemso_engine::rank::RankPoints;
use diemso_engine::session::{Game, RoundPhase, SessionState};
use diemso_engine::storage::{JsonFileStore, MemoryStore, SessionStore, StorageError};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Collects the level and target of every event.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

impl<S: tracing::Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        self.0
            .lock()
            .unwrap()
            .push((*meta.level(), meta.target().to_string()));
    }
}

fn tien_len() -> (SessionState, Vec<PlayerId>) {
    let players = seat_players(["An", "Binh", "Chi"]).expect("players");
    let ids = players.iter().map(|p| p.id().clone()).collect();
    (
        SessionState::new_tien_len(players, RankPoints::default()).expect("session"),
        ids,
    )
}

#[test]
fn snapshot_uses_camel_case_layout() {
    let (s, ids) = tien_len();
    let s = s.submit_ranking(&ids).expect("ranking").state;
    let mut store = MemoryStore::new();
    assert!(store.save(Game::TienLen.storage_key(), &s));

    let json: serde_json::Value =
        serde_json::from_str(store.raw("tienlen").expect("stored")).expect("json");
    assert_eq!(json["players"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["gameConfig"]["game"], "tien_len");
    assert_eq!(json["gameConfig"]["rankPoints"]["FIRST"], 5);
    let round = &json["history"][0];
    assert!(round["id"].as_str().is_some());
    assert!(round["timestamp"].as_i64().is_some());
    assert_eq!(round["scoreChanges"][ids[0].as_str()], 5);
}

#[test]
fn file_store_round_trip_keeps_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (s, ids) = tien_len();
    let s = s.submit_ranking(&ids).expect("ranking").state;

    let mut store = JsonFileStore::new(dir.path());
    store.try_save("tienlen", &s).expect("save");
    let loaded = store.load_or("tienlen", tien_len().0);
    assert_eq!(loaded, s);
    assert!(loaded.audit().is_empty());
}

#[test]
fn collecting_round_is_not_persisted() {
    let players = seat_players(["Dealer", "Phuong"]).expect("players");
    let s = SessionState::new_xi_dach(players, None)
        .expect("session")
        .open_round(10)
        .expect("open");
    let mut store = MemoryStore::new();
    store.save("xidach", &s);
    let loaded = store.try_load("xidach").expect("load").expect("present");
    assert!(matches!(loaded.phase(), RoundPhase::Idle));
    assert_eq!(loaded.dealer_id(), s.dealer_id());
}

#[test]
fn corrupt_file_falls_back_and_warns() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("tienlen.json"), "{\"players\": 42").expect("write");
    let store = JsonFileStore::new(dir.path());
    assert!(matches!(
        store.try_load("tienlen"),
        Err(StorageError::Json { .. })
    ));

    let captured = Captured::default();
    let subscriber = Registry::default().with(captured.clone());
    let (fresh, _) = tien_len();
    let loaded = tracing::subscriber::with_default(subscriber, || {
        store.load_or("tienlen", fresh.clone())
    });
    assert_eq!(loaded, fresh);
    let events = captured.0.lock().unwrap();
    assert!(events
        .iter()
        .any(|(level, target)| *level == Level::WARN && target.starts_with("diemso_engine")));
}

#[test]
fn unwritable_dir_reports_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "x").expect("write");
    let mut store = JsonFileStore::new(&blocker);
    let (s, _) = tien_len();
    assert!(matches!(
        store.try_save("tienlen", &s),
        Err(StorageError::Io { .. })
    ));
    assert!(!store.save("tienlen", &s));
}
