/// Recurrence, reminders, day plans, countdowns and configuration
use chrono::{DateTime, Duration, NaiveDate, Utc};
use habit_ledger::domain::{calendar, obligation, plan};
use habit_ledger::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn block(title: &str, start: &str, minutes: u32) -> TimeBlock {
    TimeBlock {
        title: title.to_string(),
        start: start.to_string(),
        minutes,
    }
}

#[test]
fn test_monthly_clamp_is_measured_from_the_anchor() {
    let anchor = date(2025, 1, 31);
    let next = |reference| obligation::next_occurrence(anchor, RecurrenceKind::Monthly, reference);

    assert_eq!(next(date(2025, 2, 1)), date(2025, 2, 28));
    assert_eq!(next(date(2025, 3, 1)), date(2025, 3, 31));
    assert_eq!(next(date(2025, 4, 1)), date(2025, 4, 30));
    assert_eq!(next(date(2025, 4, 30)), date(2025, 4, 30));
    assert_eq!(next(date(2025, 5, 1)), date(2025, 5, 31));
    assert_eq!(next(date(2024, 12, 1)), anchor);
}

#[test]
fn test_yearly_leap_day_anchor() {
    let anchor = date(2024, 2, 29);
    let next = |reference| obligation::next_occurrence(anchor, RecurrenceKind::Yearly, reference);

    assert_eq!(next(date(2024, 3, 1)), date(2025, 2, 28));
    assert_eq!(next(date(2027, 3, 1)), date(2028, 2, 29));
}

#[test]
fn test_daily_weekly_and_one_off() {
    let anchor = date(2025, 3, 3);

    assert_eq!(
        obligation::next_occurrence(anchor, RecurrenceKind::Daily, date(2025, 3, 20)),
        date(2025, 3, 20)
    );
    assert_eq!(
        obligation::next_occurrence(anchor, RecurrenceKind::Weekly, date(2025, 3, 11)),
        date(2025, 3, 17)
    );
    assert_eq!(
        obligation::next_occurrence(anchor, RecurrenceKind::Weekly, date(2025, 3, 10)),
        date(2025, 3, 10)
    );
    // A one-off stays on its anchor and shows as overdue
    assert_eq!(
        obligation::next_occurrence(anchor, RecurrenceKind::None, date(2025, 3, 20)),
        anchor
    );
    assert_eq!(obligation::days_until(anchor, date(2025, 3, 20)), -17);
}

#[test]
fn test_reminder_summary_through_the_ledger() {
    let ledger = HabitLedger::with_store(MemoryStore::new());
    let reference = date(2025, 3, 1);

    let passport = ledger
        .add_obligation("Passport", None, "2025-02-20", RecurrenceKind::None)
        .unwrap();
    ledger
        .add_obligation("Phone", Some(25), "2025-01-06", RecurrenceKind::Monthly)
        .unwrap();
    ledger
        .add_obligation("Domain", Some(15), "2024-04-20", RecurrenceKind::Yearly)
        .unwrap();

    let summary = ledger.reminder_summary(reference);
    let names: Vec<&str> = summary.occurrences.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Passport", "Phone", "Domain"]);

    let overdue = &summary.occurrences[0];
    assert_eq!(overdue.days_until, -9);
    assert_eq!(overdue.urgency, Urgency::Urgent);
    assert_eq!(summary.occurrences[1].days_until, 5);
    assert_eq!(summary.occurrences[1].urgency, Urgency::Soon);
    assert_eq!(summary.occurrences[2].urgency, Urgency::Later);
    assert_eq!(summary.due_this_horizon, 25);
    assert_eq!(summary.due_next_horizon, 15);

    let occurrence = ledger.next_occurrence(&passport.id, reference).unwrap();
    assert_eq!(occurrence.date, date(2025, 2, 20));

    ledger.remove_obligation(&passport.id).unwrap();
    assert!(matches!(
        ledger.next_occurrence(&passport.id, reference),
        Err(LedgerError::Domain(DomainError::UnknownObligation(_)))
    ));
    assert_eq!(ledger.list_obligations().len(), 2);
}

#[test]
fn test_obligation_needs_a_valid_anchor_and_name() {
    let ledger = HabitLedger::with_store(MemoryStore::new());
    assert!(matches!(
        ledger.add_obligation("Rent", Some(900), "2025-02-29", RecurrenceKind::Monthly),
        Err(LedgerError::Domain(DomainError::InvalidDate(_)))
    ));
    assert!(ledger
        .add_obligation("  ", None, "2025-02-01", RecurrenceKind::Monthly)
        .is_err());
    assert!(ledger.list_obligations().is_empty());
}

#[test]
fn test_recurrence_names() {
    assert_eq!("monthly".parse::<RecurrenceKind>().unwrap(), RecurrenceKind::Monthly);
    assert_eq!(" Weekly ".parse::<RecurrenceKind>().unwrap(), RecurrenceKind::Weekly);
    assert!("fortnightly".parse::<RecurrenceKind>().is_err());
}

#[test]
fn test_plan_conflicts_follow_the_running_end() {
    let day = DayPlan::new(vec![
        block("Lunch", "12:00", 45),
        block("Deep work", "09:00", 180),
        block("Standup", "09:30", 15),
        block("Email", "11:30", 30),
        block("Gym", "25:00", 60),
    ]);

    let titles: Vec<&str> = day.blocks.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Deep work", "Standup", "Email", "Lunch"]);
    assert_eq!(day.invalid.len(), 1);
    assert_eq!(day.total_minutes(), 270);

    let conflicts = day.conflicts();
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].earlier, "Deep work");
    assert_eq!(conflicts[0].later, "Standup");
    // Email starts before Deep work's 12:00 end even though Standup ended at 09:45
    assert_eq!(conflicts[1].earlier, "Standup");
    assert_eq!(conflicts[1].later, "Email");
    assert_eq!(conflicts[1].at, "11:30");
}

#[test]
fn test_back_to_back_blocks_do_not_conflict() {
    let day = DayPlan::new(vec![block("A", "08:00", 60), block("B", "09:00", 30)]);
    assert!(day.conflicts().is_empty());
    assert_eq!(plan::format_hhmm(23 * 60 + 90), "00:30");
    assert_eq!(plan::parse_hhmm("7:05"), Some(425));
    assert_eq!(plan::parse_hhmm("24:00"), None);
}

#[test]
fn test_countdown_is_never_negative() {
    let end = instant("2025-05-01T12:00:00Z");
    assert_eq!(
        calendar::time_remaining(end, end - Duration::minutes(25)),
        Duration::minutes(25)
    );
    assert_eq!(calendar::time_remaining(end, end), Duration::zero());
    assert_eq!(
        calendar::time_remaining(end, end + Duration::hours(1)),
        Duration::zero()
    );
    assert_eq!(calendar::format_countdown(Duration::minutes(25)), "25:00");
}

#[test]
fn test_calendar_keys() {
    assert_eq!(calendar::iso_date_key(date(2025, 7, 4)), "2025-07-04");
    assert_eq!(calendar::iso_week_key(date(2025, 12, 29)), "2026-W01");
    assert_eq!(calendar::date_range(date(2024, 3, 1), 2), vec![date(2024, 2, 29), date(2024, 3, 1)]);
    assert!(calendar::parse_date("2025-04-31").is_err());
}

#[test]
fn test_config_rejects_inconsistent_values() {
    let config = LedgerConfig::from_toml(
        r#"
        [storage]
        backend = "sqlite"

        [day_mode]
        high = 8.0
        "#,
    )
    .unwrap();
    assert_eq!(config.storage.backend, Backend::Sqlite);
    assert_eq!(config.day_mode.high, 8.0);
    assert_eq!(config.day_mode.medium, 4.5);
    assert_eq!(config.tracking.default_window_days, 30);

    for bad in [
        "[day_mode]\nhigh = 4.0\nmedium = 6.0",
        "[tracking]\ndefault_window_days = 0",
        "[tracking]\nscore_done_at = 11",
        "[reminders]\nurgent_within_days = 9\nsoon_within_days = 7",
        "[reminders]\nhorizon_days = 0",
    ] {
        assert!(
            matches!(LedgerConfig::from_toml(bad), Err(ConfigError::Invalid(_))),
            "accepted {:?}",
            bad
        );
    }
    assert!(matches!(
        LedgerConfig::from_toml("[storage]\nbackend = \"postgres\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_configured_threshold_applies_to_new_score_habits() {
    let config = LedgerConfig::from_toml("[tracking]\nscore_done_at = 5").unwrap();
    let ledger = HabitLedger::new(MemoryStore::new(), config);

    let kind = ledger.status_kind("score").unwrap();
    assert_eq!(kind, StatusKind::Score { done_at: 5 });
    assert!(ledger.status_kind("stars").is_err());
}
