/// The ledger over the JSON-file and SQLite stores
use chrono::NaiveDate;
use habit_ledger::storage::TRACKER_COLLECTION;
use habit_ledger::*;
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

/// Run the same workflow against any store and check what a reopened store sees
fn exercise<S: DocumentStore>(first: HabitLedger<S>, reopen: impl Fn() -> HabitLedger<S>) {
    let run = first.add_habit("Run").unwrap();
    let read = first.add_habit("Read").unwrap();
    for d in 1..=3 {
        first.record_entry(&run.id, day(d), EntryStatus::DONE, "").unwrap();
    }
    first.record_entry(&read.id, day(3), EntryStatus::REST, "tired").unwrap();
    first
        .add_obligation("Rent", Some(950), "2025-01-31", RecurrenceKind::Monthly)
        .unwrap();
    drop(first);

    let ledger = reopen();
    let names: Vec<String> = ledger.list_habits().into_iter().map(|h| h.name).collect();
    assert_eq!(names, vec!["Run", "Read"]);
    assert_eq!(ledger.current_streak(&run.id, day(3)).unwrap(), 3);
    assert_eq!(ledger.get_entry(&read.id, day(3)).unwrap().note, "tired");
    assert!(ledger.get_entry(&read.id, day(3)).unwrap().saved_at.is_some());

    let occurrence = ledger.reminder_summary(day(1)).occurrences.remove(0);
    assert_eq!(occurrence.date, day(30));

    ledger.remove_habit(&run.id).unwrap();
    drop(ledger);

    let ledger = reopen();
    assert_eq!(ledger.list_habits().len(), 1);
    assert!(ledger.entries_in_range(&run.id, day(1), day(30)).is_empty());
    assert_eq!(ledger.tracker().entry_count(), 1);
    assert!(matches!(
        ledger.add_habit("Read"),
        Err(LedgerError::Domain(DomainError::DuplicateName(_)))
    ));
}

#[test]
fn test_json_store_persists_across_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().to_path_buf();

    let open = || HabitLedger::with_store(JsonFileStore::open(path.clone()).unwrap());
    exercise(open(), open);

    assert!(path.join("tracker.json").exists());
    assert!(path.join("obligations.json").exists());
    // No temp files left behind by the atomic save
    let leftovers = std::fs::read_dir(&path)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");

    let open = || HabitLedger::with_store(SqliteDocumentStore::open(&db_path).unwrap());
    exercise(open(), open);

    let store = SqliteDocumentStore::open(&db_path).unwrap();
    assert_eq!(store.collection_count().unwrap(), 2);
}

#[test]
fn test_json_file_is_readable_camel_case() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let ledger = HabitLedger::with_store(JsonFileStore::open(dir.path()).unwrap());
    let run = ledger.add_habit("Run").unwrap();
    ledger.record_entry(&run.id, day(7), EntryStatus::DONE, "").unwrap();

    let text = std::fs::read_to_string(dir.path().join("tracker.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["version"], serde_json::json!(1));
    assert_eq!(value["habits"][0]["id"], serde_json::json!(run.id.as_str()));
    assert!(value["habits"][0]["createdAt"].is_string());
    assert_eq!(
        value["entries"]["2025-04-07"][run.id.as_str()]["status"],
        serde_json::json!("done")
    );
    assert!(text.contains('\n'), "document should be pretty-printed");
}

#[test]
fn test_corrupt_json_file_loads_empty_then_recovers() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("tracker.json"), "{ this is not json").unwrap();

    let ledger = HabitLedger::with_store(JsonFileStore::open(dir.path()).unwrap());
    assert!(ledger.list_habits().is_empty());
    assert!(ledger.store().read(TRACKER_COLLECTION).is_err());

    ledger.add_habit("Run").unwrap();
    assert!(ledger.store().read(TRACKER_COLLECTION).unwrap().is_some());
    assert_eq!(ledger.list_habits().len(), 1);
}

#[test]
fn test_missing_directory_is_created() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let nested = dir.path().join("a").join("b");

    let store = JsonFileStore::open(nested.clone()).unwrap();
    assert!(nested.is_dir());
    assert!(store.read(TRACKER_COLLECTION).unwrap().is_none());
}

#[test]
fn test_invalid_collection_ids_are_refused() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let doc = storage::Document::new();

    assert!(matches!(
        store.save("../escape", &doc),
        Err(StorageError::InvalidCollection(_))
    ));
    assert!(matches!(store.save("", &doc), Err(StorageError::InvalidCollection(_))));
    assert!(store.save("tracker", &doc).is_ok());
}
