/// Streak, completion-rate and report behavior through the ledger facade
use chrono::{Duration, NaiveDate};
use habit_ledger::domain::{calendar, streak};
use habit_ledger::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn ledger() -> HabitLedger<MemoryStore> {
    HabitLedger::with_store(MemoryStore::new())
}

/// Record statuses for consecutive days, the last one on `today()`
fn record_run(ledger: &HabitLedger<MemoryStore>, id: &HabitId, statuses: &[EntryStatus]) {
    let first = today() - Duration::days(statuses.len() as i64 - 1);
    for (offset, status) in statuses.iter().enumerate() {
        ledger
            .record_entry(id, first + Duration::days(offset as i64), *status, "")
            .unwrap();
    }
}

#[test]
fn test_rest_two_days_back_breaks_the_chain() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    record_run(
        &ledger,
        &run.id,
        &[EntryStatus::DONE, EntryStatus::DONE, EntryStatus::REST, EntryStatus::DONE],
    );

    assert_eq!(ledger.current_streak(&run.id, today()).unwrap(), 1);
    assert_eq!(ledger.max_streak(&run.id, today(), Some(4)).unwrap(), 2);
}

#[test]
fn test_five_done_days_make_a_five_day_streak() {
    let ledger = ledger();
    let read = ledger.add_habit("Read").unwrap();
    record_run(&ledger, &read.id, &[EntryStatus::DONE; 5]);

    assert_eq!(ledger.current_streak(&read.id, today()).unwrap(), 5);
    assert_eq!(ledger.completion_rate(&read.id, today(), Some(5)).unwrap(), 100.0);
    assert_eq!(ledger.completion_rate(&read.id, today(), Some(10)).unwrap(), 50.0);
}

#[test]
fn test_missing_day_stops_the_count() {
    let ledger = ledger();
    let stretch = ledger.add_habit("Stretch").unwrap();
    for offset in [0, 1, 3] {
        ledger
            .record_entry(&stretch.id, today() - Duration::days(offset), EntryStatus::DONE, "")
            .unwrap();
    }

    assert_eq!(ledger.current_streak(&stretch.id, today()).unwrap(), 2);
    // Nothing recorded on the as-of day itself
    let gap_day = today() - Duration::days(2);
    assert_eq!(ledger.current_streak(&stretch.id, gap_day).unwrap(), 0);
}

#[test]
fn test_miss_counts_like_an_absent_day() {
    let ledger = ledger();
    let floss = ledger.add_habit("Floss").unwrap();
    record_run(&ledger, &floss.id, &[EntryStatus::DONE, EntryStatus::MISS]);

    assert_eq!(ledger.current_streak(&floss.id, today()).unwrap(), 0);
    assert_eq!(ledger.completion_rate(&floss.id, today(), Some(2)).unwrap(), 50.0);
}

#[test]
fn test_completion_rate_stays_in_bounds() {
    let dates = calendar::date_range(today(), 7);
    for pattern in 0u8..=127 {
        let rate = streak::completion_rate(&dates, |d| {
            let index = calendar::days_between(dates[0], d) as u8;
            pattern & (1 << index) != 0
        });
        assert!((0.0..=100.0).contains(&rate), "rate {} out of bounds", rate);
    }

    assert_eq!(streak::completion_rate(&[], |_| true), 0.0);
    assert_eq!(streak::completion_rate(&dates[..3], |d| d == dates[0]), 33.3);
}

#[test]
fn test_empty_window_is_allowed_and_oversized_window_is_not() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();

    assert_eq!(ledger.completion_rate(&run.id, today(), Some(0)).unwrap(), 0.0);
    assert!(matches!(
        ledger.max_streak(&run.id, today(), Some(400)),
        Err(LedgerError::Domain(DomainError::Validation { .. }))
    ));
}

#[test]
fn test_unknown_habit_in_streak_queries() {
    let ledger = ledger();
    let ghost = HabitId::parse("ghost").unwrap();

    assert!(matches!(
        ledger.current_streak(&ghost, today()),
        Err(LedgerError::Domain(DomainError::UnknownHabit(_)))
    ));
    assert!(ledger.entries_in_range(&ghost, today(), today()).is_empty());
    assert!(ledger.get_entry(&ghost, today()).is_none());
}

#[test]
fn test_score_habit_counts_scores_at_threshold() {
    let ledger = ledger();
    let focus = ledger
        .add_habit_with_kind("Focus", StatusKind::Score { done_at: 6 })
        .unwrap();
    record_run(
        &ledger,
        &focus.id,
        &[EntryStatus::Score(9), EntryStatus::Score(5), EntryStatus::Score(6), EntryStatus::Score(8)],
    );

    assert_eq!(ledger.current_streak(&focus.id, today()).unwrap(), 2);
    assert_eq!(ledger.completion_rate(&focus.id, today(), Some(4)).unwrap(), 75.0);
}

#[test]
fn test_reports_cover_every_habit_with_encouragement() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    ledger.add_habit("Read").unwrap();
    record_run(&ledger, &run.id, &[EntryStatus::DONE; 3]);

    let reports = ledger.habit_reports(today(), Some(7)).unwrap();
    assert_eq!(reports.len(), 2);

    let run_report = reports.iter().find(|r| r.habit_id == run.id).unwrap();
    assert_eq!(run_report.summary.current_streak, 3);
    assert_eq!(run_report.summary.done_count, 3);
    assert_eq!(run_report.summary.last_done, Some(today()));
    assert!(run_report.encouragement.contains('3'));

    let read_report = reports.iter().find(|r| r.name == "Read").unwrap();
    assert_eq!(read_report.summary.current_streak, 0);
    assert_eq!(read_report.summary.last_done, None);
}

#[test]
fn test_status_grid_rows_follow_dates() {
    let ledger = ledger();
    let run = ledger.add_habit("Run").unwrap();
    record_run(&ledger, &run.id, &[EntryStatus::REST, EntryStatus::DONE]);

    let grid = ledger.status_grid(today(), Some(3)).unwrap();
    assert_eq!(grid.dates, calendar::date_range(today(), 3));
    assert_eq!(grid.rows.len(), 1);
    assert_eq!(
        grid.rows[0].cells,
        vec![None, Some(EntryStatus::REST), Some(EntryStatus::DONE)]
    );
}

#[test]
fn test_day_mode_over_score_habits() {
    let ledger = ledger();
    let energy = ledger
        .add_habit_with_kind("Energy", StatusKind::Score { done_at: 7 })
        .unwrap();
    let mood = ledger
        .add_habit_with_kind("Mood", StatusKind::Score { done_at: 7 })
        .unwrap();

    ledger
        .record_entry(&energy.id, today(), EntryStatus::Score(8), "")
        .unwrap();
    let reading = ledger.day_mode(&[], today()).unwrap();
    assert_eq!(reading.mode, DayMode::Undetermined);
    assert_eq!(reading.missing, 1);

    ledger
        .record_entry(&mood.id, today(), EntryStatus::Score(4), "")
        .unwrap();
    let reading = ledger.day_mode(&[], today()).unwrap();
    assert_eq!(reading.mode, DayMode::Medium);
    assert_eq!(reading.average, Some(6.0));

    let run = ledger.add_habit("Run").unwrap();
    assert!(ledger.day_mode(&[run.id], today()).is_err());
}
