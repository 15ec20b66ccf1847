//! Integration tests for the SQLite event store
//!
//! Verifies persistence across reopen, in-place upgrade of databases written
//! by the older command-line scheduler, and that the SQLite and in-memory
//! backends give the resolver identical answers.

mod common;

use common::event_at;
use schedule_assistant::command::{Disposition, TurnProcessor};
use schedule_assistant::core::config::{StoreBackend, StoreConfig};
use schedule_assistant::core::types::{Event, Intent, IntentAction};
use schedule_assistant::store::{open_store, EventStore, InMemoryEventStore, SqliteEventStore};
use std::time::Duration;

fn scripted_turn() -> Vec<Intent> {
    vec![
        Intent::new(
            IntentAction::Create,
            event_at("Dinner", "2025-09-26", "20:00").with_participants(["Minsu"]),
        ),
        Intent::new(IntentAction::Create, event_at("Workout", "2025-09-26", "19:00")),
        Intent::new(
            IntentAction::Update,
            Event::new().with_title("Dinner").with_location("Gangnam"),
        ),
        Intent::new(IntentAction::Read, Event::new().with_date("2025-09-26")),
        Intent::new(IntentAction::Delete, Event::new().with_title("Breakfast")),
        Intent::clarify(IntentAction::Create, Event::new(), ["title", "date"]),
    ]
}

fn seeded(store: &dyn EventStore) {
    store
        .create(&event_at("Meeting", "2025-09-26", "19:00"))
        .unwrap();
}

#[test]
fn test_events_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");

    {
        let store = SqliteEventStore::open(&path, Duration::from_secs(1)).unwrap();
        let intents = vec![Intent::new(
            IntentAction::Create,
            event_at("Dentist", "2025-10-01", "09:30"),
        )];
        let result = TurnProcessor::new(&store).process_turn(None, &intents);
        assert!(result.text().starts_with("✅"));
        store.close().unwrap();
    }

    let store = SqliteEventStore::open(&path, Duration::from_secs(1)).unwrap();
    let events = store.read(&Event::new().with_date("2025-10-01")).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title.as_deref(), Some("Dentist"));
}

/// The pre-location layout: participants stored as comma-joined text
fn write_legacy_database(path: &std::path::Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            date TEXT,
            time TEXT,
            participants TEXT
        );
        INSERT INTO events (title, date, time, participants)
        VALUES ('Meeting', '2025-09-26', '19:00', 'Team,Minsu');
        INSERT INTO events (title, date, time, participants)
        VALUES ('Lunch', '2025-09-27', '12:00', '');",
    )
    .unwrap();
}

#[test]
fn test_legacy_database_is_upgraded_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scheduler.db");
    write_legacy_database(&path);

    let store = SqliteEventStore::open(&path, Duration::from_secs(1)).unwrap();
    let intents = vec![
        Intent::new(IntentAction::Read, Event::new().with_date("2025-09-26")),
        Intent::new(IntentAction::Create, event_at("Workout", "2025-09-26", "20:00")),
        Intent::new(IntentAction::Create, event_at("Review", "2025-09-26", "19:00")),
        Intent::new(
            IntentAction::Update,
            Event::new().with_title("Lunch").with_location("Cafeteria"),
        ),
    ];

    let result = TurnProcessor::new(&store).process_turn(None, &intents);

    assert_eq!(
        result.dispositions(),
        vec![
            Disposition::Success,
            Disposition::Success,
            Disposition::ConflictDetected,
            Disposition::Success,
        ]
    );
    assert!(result.fragments[0]
        .text
        .contains("2025-09-26 19:00 → Meeting (with: Team, Minsu)"));

    let lunch = store.read(&Event::new().with_title("Lunch")).unwrap();
    assert_eq!(lunch[0].location.as_deref(), Some("Cafeteria"));
    assert_eq!(lunch[0].participants, None);
    store.close().unwrap();

    // Reopening an upgraded file is a no-op
    let store = SqliteEventStore::open(&path, Duration::from_secs(1)).unwrap();
    assert_eq!(store.read(&Event::new()).unwrap().len(), 3);
}

#[test]
fn test_backends_agree_on_scripted_turn() {
    let memory = InMemoryEventStore::new();
    let sqlite = SqliteEventStore::open_in_memory().unwrap();
    seeded(&memory);
    seeded(&sqlite);

    let intents = scripted_turn();
    let from_memory = TurnProcessor::new(&memory).process_turn(None, &intents);
    let from_sqlite = TurnProcessor::new(&sqlite).process_turn(None, &intents);

    assert_eq!(from_memory, from_sqlite);
    assert_eq!(
        memory.read(&Event::new()).unwrap(),
        sqlite.read(&Event::new()).unwrap()
    );
}

#[test]
fn test_open_store_selects_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        path: dir.path().join("selected.db"),
        busy_timeout_ms: 1000,
    };

    let store = open_store(&config).unwrap();
    store
        .create(&event_at("Standup", "2025-09-29", "09:00"))
        .unwrap();
    drop(store);

    assert!(config.path.exists());
}
