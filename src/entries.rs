//! Daily entry manager
//!
//! Entries are keyed by `(date, habit id)`. Recording an entry for a key that
//! already has one overwrites it in place, so there is never more than one
//! entry per habit per day.

use chrono::NaiveDate;

use crate::domain::{DailyEntry, DomainError, EntryStatus, HabitId};
use crate::storage::TrackerDocument;

/// Record a habit's status for a date, replacing any earlier entry for that day
pub fn record_entry(
    tracker: &mut TrackerDocument,
    habit_id: &HabitId,
    date: NaiveDate,
    status: EntryStatus,
    note: &str,
) -> Result<DailyEntry, DomainError> {
    let habit = tracker
        .habit(habit_id)
        .ok_or_else(|| DomainError::UnknownHabit(habit_id.to_string()))?;
    let entry = DailyEntry::for_habit(habit, date, status, note)?;

    let replaced = tracker
        .entries
        .entry(date)
        .or_default()
        .insert(habit_id.clone(), entry.to_record());

    match replaced {
        Some(previous) => tracing::debug!(
            "Updated entry for {} on {}: {} -> {}",
            habit_id,
            date,
            previous.status,
            entry.status
        ),
        None => tracing::debug!("Recorded {} for {} on {}", entry.status, habit_id, date),
    }

    Ok(entry)
}

/// The entry for a habit on a date, if one exists
///
/// Entries left behind by removed habits are not returned.
pub fn get_entry(tracker: &TrackerDocument, habit_id: &HabitId, date: NaiveDate) -> Option<DailyEntry> {
    tracker.habit(habit_id)?;
    tracker
        .entry(habit_id, date)
        .map(|record| DailyEntry::from_record(habit_id.clone(), date, record))
}

/// Entries for a habit between two dates (inclusive), oldest first
///
/// Dates without an entry are simply absent. An unknown habit or a reversed
/// range yields nothing.
pub fn entries_in_range(
    tracker: &TrackerDocument,
    habit_id: &HabitId,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyEntry> {
    if start > end || tracker.habit(habit_id).is_none() {
        return Vec::new();
    }

    tracker
        .entries
        .range(start..=end)
        .filter_map(|(date, day)| {
            day.get(habit_id)
                .map(|record| DailyEntry::from_record(habit_id.clone(), *date, record))
        })
        .collect()
}

/// Delete every entry for every habit; returns how many were removed
pub fn clear_entries(tracker: &mut TrackerDocument) -> usize {
    let removed = tracker.entry_count();
    tracker.entries.clear();
    tracing::debug!("Cleared {} entries", removed);
    removed
}

/// Drop entries whose habit no longer exists, and empty date buckets
pub fn compact(tracker: &mut TrackerDocument) -> usize {
    let before = tracker.entry_count();
    let habits = &tracker.habits;

    for day in tracker.entries.values_mut() {
        day.retain(|id, _| habits.iter().any(|h| &h.id == id));
    }
    tracker.entries.retain(|_, day| !day.is_empty());

    let removed = before - tracker.entry_count();
    if removed > 0 {
        tracing::debug!("Compaction removed {} orphaned entries", removed);
    }
    removed
}
