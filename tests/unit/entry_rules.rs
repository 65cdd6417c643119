/// Registry and entry rules: names, upserts, status kinds and cascades
use chrono::NaiveDate;
use habit_ledger::*;
use serde_json::json;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn ledger() -> HabitLedger<MemoryStore> {
    HabitLedger::with_store(MemoryStore::new())
}

#[test]
fn test_second_write_for_same_day_replaces_the_first() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();

    ledger.record_entry(&run.id, day(4), EntryStatus::DONE, "easy 5k").unwrap();
    ledger.record_entry(&run.id, day(4), EntryStatus::REST, "").unwrap();

    let entries = ledger.entries_in_range(&run.id, day(1), day(31));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, EntryStatus::REST);
    assert_eq!(entries[0].note, "");
    assert_eq!(ledger.tracker().entry_count(), 1);
}

#[test]
fn test_duplicate_name_leaves_one_habit() {
    let ledger = ledger();
    ledger.add_habit("Run").unwrap();

    let err = ledger.add_habit("Run").unwrap_err();
    assert!(matches!(err, LedgerError::Domain(DomainError::DuplicateName(_))));

    let named_run = ledger
        .list_habits()
        .into_iter()
        .filter(|h| h.name == "Run")
        .count();
    assert_eq!(named_run, 1);
}

#[test]
fn test_rename_keeps_id_and_checks_duplicates() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    ledger.add_habit("Swim").unwrap();

    let renamed = ledger.rename_habit(&run.id, "  Morning Run ").unwrap();
    assert_eq!(renamed.id, run.id);
    assert_eq!(renamed.name, "Morning Run");

    assert!(matches!(
        ledger.rename_habit(&run.id, "Swim"),
        Err(LedgerError::Domain(DomainError::DuplicateName(_)))
    ));
    // Renaming to its own name is not a duplicate
    assert!(ledger.rename_habit(&run.id, "Morning Run").is_ok());
    assert!(matches!(
        ledger.rename_habit(&HabitId::parse("nope").unwrap(), "Walk"),
        Err(LedgerError::Domain(DomainError::UnknownHabit(_)))
    ));
}

#[test]
fn test_blank_or_long_names_are_rejected() {
    let ledger = ledger();
    assert!(matches!(
        ledger.add_habit("   "),
        Err(LedgerError::Domain(DomainError::InvalidHabitName(_)))
    ));
    assert!(matches!(
        ledger.add_habit(&"x".repeat(MAX_HABIT_NAME_CHARS + 1)),
        Err(LedgerError::Domain(DomainError::InvalidHabitName(_)))
    ));
    assert!(ledger.list_habits().is_empty());
}

#[test]
fn test_status_kind_matrix() {
    let ledger = ledger();
    let marks = ledger.add_habit("Journal").unwrap();
    let check = ledger.add_habit_with_kind("Vitamins", StatusKind::Check).unwrap();
    let score = ledger
        .add_habit_with_kind("Energy", StatusKind::Score { done_at: 7 })
        .unwrap();

    let cases = [
        (&marks.id, EntryStatus::DONE, true),
        (&marks.id, EntryStatus::REST, true),
        (&marks.id, EntryStatus::MISS, true),
        (&marks.id, EntryStatus::Score(5), false),
        (&check.id, EntryStatus::DONE, true),
        (&check.id, EntryStatus::MISS, true),
        (&check.id, EntryStatus::REST, false),
        (&check.id, EntryStatus::Score(1), false),
        (&score.id, EntryStatus::Score(0), true),
        (&score.id, EntryStatus::Score(10), true),
        (&score.id, EntryStatus::Score(11), false),
        (&score.id, EntryStatus::DONE, false),
    ];

    for (id, status, accepted) in cases {
        let result = ledger.record_entry(id, day(10), status, "");
        if accepted {
            assert!(result.is_ok(), "{} should accept {}", id, status);
        } else {
            assert!(
                matches!(result, Err(LedgerError::Domain(DomainError::InvalidStatus(_)))),
                "{} should reject {}",
                id,
                status
            );
        }
    }
}

#[test]
fn test_loose_status_values() {
    assert_eq!(EntryStatus::from_value(&json!("done")).unwrap(), EntryStatus::DONE);
    assert_eq!(EntryStatus::from_value(&json!(true)).unwrap(), EntryStatus::DONE);
    assert_eq!(EntryStatus::from_value(&json!(false)).unwrap(), EntryStatus::MISS);
    assert_eq!(EntryStatus::from_value(&json!(8)).unwrap(), EntryStatus::Score(8));
    assert!(EntryStatus::from_value(&json!("skipped")).is_err());
    assert!(EntryStatus::from_value(&json!(-1)).is_err());
    assert!(EntryStatus::from_value(&json!(null)).is_err());
}

#[test]
fn test_note_length_is_limited() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();

    let long_note = "a".repeat(MAX_NOTE_CHARS + 1);
    assert!(matches!(
        ledger.record_entry(&run.id, day(2), EntryStatus::DONE, &long_note),
        Err(LedgerError::Domain(DomainError::Validation { .. }))
    ));
    assert!(ledger.get_entry(&run.id, day(2)).is_none());
}

#[test]
fn test_recording_for_unknown_habit_fails() {
    let ledger = ledger();
    let ghost = HabitId::parse("ghost").unwrap();
    assert!(matches!(
        ledger.record_entry(&ghost, day(1), EntryStatus::DONE, ""),
        Err(LedgerError::Domain(DomainError::UnknownHabit(_)))
    ));
}

#[test]
fn test_remove_cascades_to_entries() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    let read = ledger.add_habit("Read").unwrap();
    for d in 1..=5 {
        ledger.record_entry(&run.id, day(d), EntryStatus::DONE, "").unwrap();
    }
    ledger.record_entry(&read.id, day(3), EntryStatus::DONE, "").unwrap();

    let removed = ledger.remove_habit(&run.id).unwrap();
    assert_eq!(removed.entries_removed, 5);
    assert!(ledger.entries_in_range(&run.id, day(1), day(31)).is_empty());
    assert!(ledger.get_entry(&run.id, day(3)).is_none());
    assert_eq!(ledger.entries_in_range(&read.id, day(1), day(31)).len(), 1);

    assert!(matches!(
        ledger.remove_habit(&run.id),
        Err(LedgerError::Domain(DomainError::UnknownHabit(_)))
    ));
}

#[test]
fn test_range_is_inclusive_and_ascending() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    for d in [9, 3, 6, 12] {
        ledger.record_entry(&run.id, day(d), EntryStatus::DONE, "").unwrap();
    }

    let dates: Vec<NaiveDate> = ledger
        .entries_in_range(&run.id, day(3), day(9))
        .into_iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(dates, vec![day(3), day(6), day(9)]);
    assert!(ledger.entries_in_range(&run.id, day(9), day(3)).is_empty());
}

#[test]
fn test_clear_keeps_habits() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    ledger.record_entry(&run.id, day(1), EntryStatus::DONE, "").unwrap();
    ledger.record_entry(&run.id, day(2), EntryStatus::MISS, "").unwrap();

    assert_eq!(ledger.clear_entries().unwrap(), 2);
    assert_eq!(ledger.list_habits().len(), 1);
    assert_eq!(ledger.tracker().entry_count(), 0);
}
