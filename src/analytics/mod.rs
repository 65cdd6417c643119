//! Streak and aggregation engine
//!
//! Derives every figure (streaks, completion rates, grids, day modes) from
//! the entries in a loaded tracker document. Nothing here is stored; each
//! call recomputes from scratch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::date_range;
use crate::domain::{
    day_mode, streak, DayModeReading, DayModeThresholds, DomainError, EntryStatus,
    HabitDefinition, HabitId, StatusKind, StreakSummary,
};
use crate::storage::TrackerDocument;

/// Aggregate figures for one habit over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitReport {
    pub habit_id: HabitId,
    pub name: String,
    pub summary: StreakSummary,
    pub encouragement: String,
}

/// One habit's statuses across the grid's dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub habit_id: HabitId,
    pub name: String,
    /// One cell per grid date; `None` where nothing was recorded
    pub cells: Vec<Option<EntryStatus>>,
}

/// Habits by dates, oldest date first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusGrid {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<GridRow>,
}

/// Analytics engine over tracker documents
///
/// Holds only the day mode thresholds; all other inputs are passed per call.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    thresholds: DayModeThresholds,
}

impl AnalyticsEngine {
    pub fn new(thresholds: DayModeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DayModeThresholds {
        &self.thresholds
    }

    /// Consecutive qualifying days ending at `as_of`
    pub fn current_streak(
        &self,
        tracker: &TrackerDocument,
        habit_id: &HabitId,
        as_of: NaiveDate,
    ) -> Result<u32, DomainError> {
        let habit = require_habit(tracker, habit_id)?;
        Ok(streak::current_streak(as_of, |d| is_done(tracker, habit, d)))
    }

    /// Longest qualifying run within an ordered date list
    pub fn max_streak(
        &self,
        tracker: &TrackerDocument,
        habit_id: &HabitId,
        dates: &[NaiveDate],
    ) -> Result<u32, DomainError> {
        let habit = require_habit(tracker, habit_id)?;
        Ok(streak::max_streak(dates, |d| is_done(tracker, habit, d)))
    }

    /// Percentage of `dates` with a qualifying entry; 0.0 for no dates
    pub fn completion_rate(
        &self,
        tracker: &TrackerDocument,
        habit_id: &HabitId,
        dates: &[NaiveDate],
    ) -> Result<f64, DomainError> {
        let habit = require_habit(tracker, habit_id)?;
        Ok(streak::completion_rate(dates, |d| is_done(tracker, habit, d)))
    }

    /// Streaks, rate and encouragement for one habit over `window_days` ending at `end`
    pub fn habit_report(
        &self,
        tracker: &TrackerDocument,
        habit: &HabitDefinition,
        end: NaiveDate,
        window_days: u32,
    ) -> HabitReport {
        let window = date_range(end, window_days);
        let summary =
            StreakSummary::calculate(habit.id.clone(), end, &window, |d| is_done(tracker, habit, d));
        let encouragement = summary.encouragement();

        HabitReport {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            summary,
            encouragement,
        }
    }

    /// Reports for every habit, in registry order
    pub fn habit_reports(
        &self,
        tracker: &TrackerDocument,
        end: NaiveDate,
        window_days: u32,
    ) -> Vec<HabitReport> {
        tracker
            .habits
            .iter()
            .map(|habit| self.habit_report(tracker, habit, end, window_days))
            .collect()
    }

    /// Each habit's recorded status on each day of the window
    pub fn status_grid(
        &self,
        tracker: &TrackerDocument,
        end: NaiveDate,
        window_days: u32,
    ) -> StatusGrid {
        let dates = date_range(end, window_days);
        let rows = tracker
            .habits
            .iter()
            .map(|habit| GridRow {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                cells: dates.iter().map(|d| tracker.status_on(&habit.id, *d)).collect(),
            })
            .collect();

        StatusGrid { dates, rows }
    }

    /// Classify a date from the scores of the given score habits
    ///
    /// Every listed habit must exist and be a score habit. If any of them has
    /// no score that day the result is undetermined.
    pub fn day_mode(
        &self,
        tracker: &TrackerDocument,
        habit_ids: &[HabitId],
        date: NaiveDate,
    ) -> Result<DayModeReading, DomainError> {
        let mut scores = Vec::with_capacity(habit_ids.len());

        for id in habit_ids {
            let habit = require_habit(tracker, id)?;
            if !matches!(habit.status_kind, StatusKind::Score { .. }) {
                return Err(DomainError::Validation {
                    message: format!("Habit '{}' is not a score habit", habit.name),
                });
            }
            scores.push(tracker.status_on(id, date).and_then(|s| s.score()));
        }

        Ok(day_mode::classify(&scores, &self.thresholds))
    }
}

fn require_habit<'a>(
    tracker: &'a TrackerDocument,
    habit_id: &HabitId,
) -> Result<&'a HabitDefinition, DomainError> {
    tracker
        .habit(habit_id)
        .ok_or_else(|| DomainError::UnknownHabit(habit_id.to_string()))
}

fn is_done(tracker: &TrackerDocument, habit: &HabitDefinition, date: NaiveDate) -> bool {
    tracker
        .status_on(&habit.id, date)
        .is_some_and(|status| habit.status_kind.qualifies(&status))
}
