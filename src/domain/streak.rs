//! Streak and completion-rate calculations
//!
//! Every function takes a predicate answering "was this habit done on this
//! date?", so the math is independent of how entries are stored. Only a
//! qualifying completion extends a streak: a `rest` day, a `miss` and a day
//! with no entry all break it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::HabitId;

/// Consecutive qualifying days ending at `as_of`, counting backward
///
/// Stops at the first day that is not done, including `as_of` itself: if
/// today has no completion yet the streak is zero.
pub fn current_streak<F>(as_of: NaiveDate, is_done: F) -> u32
where
    F: Fn(NaiveDate) -> bool,
{
    let mut count = 0;
    let mut cursor = Some(as_of);

    while let Some(day) = cursor {
        if !is_done(day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }

    count
}

/// Longest run of qualifying days within an ordered date list
///
/// Consecutive list elements are treated as consecutive days. Callers that
/// need true calendar contiguity must pass a gap-free range such as the one
/// produced by [`crate::domain::calendar::date_range`].
pub fn max_streak<F>(dates: &[NaiveDate], is_done: F) -> u32
where
    F: Fn(NaiveDate) -> bool,
{
    let mut running = 0;
    let mut best = 0;

    for date in dates {
        if is_done(*date) {
            running += 1;
            best = best.max(running);
        } else {
            running = 0;
        }
    }

    best
}

/// Percentage of dates that qualify, rounded to one decimal
///
/// An empty list yields exactly `0.0`.
pub fn completion_rate<F>(dates: &[NaiveDate], is_done: F) -> f64
where
    F: Fn(NaiveDate) -> bool,
{
    if dates.is_empty() {
        return 0.0;
    }

    let done = dates.iter().filter(|d| is_done(**d)).count();
    round_one_decimal(done as f64 / dates.len() as f64 * 100.0)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derived streak figures for one habit over one window
///
/// Always recomputed on request; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub habit_id: HabitId,
    /// Date the current streak is counted back from
    pub as_of: NaiveDate,
    /// Number of days in the window
    pub window_days: u32,
    pub current_streak: u32,
    /// Longest run inside the window
    pub max_streak: u32,
    /// Qualifying days inside the window
    pub done_count: u32,
    /// `done_count / window_days * 100`, one decimal
    pub completion_rate: f64,
    /// Most recent qualifying day inside the window
    pub last_done: Option<NaiveDate>,
}

impl StreakSummary {
    /// Compute every figure for a window of dates (oldest first) ending at `as_of`
    pub fn calculate<F>(habit_id: HabitId, as_of: NaiveDate, window: &[NaiveDate], is_done: F) -> Self
    where
        F: Fn(NaiveDate) -> bool,
    {
        let done_count = window.iter().filter(|d| is_done(**d)).count() as u32;
        let last_done = window.iter().rev().copied().find(|d| is_done(*d));

        Self {
            habit_id,
            as_of,
            window_days: window.len() as u32,
            current_streak: current_streak(as_of, &is_done),
            max_streak: max_streak(window, &is_done),
            done_count,
            completion_rate: completion_rate(window, &is_done),
            last_done,
        }
    }

    /// A short line of encouragement keyed on the current streak
    ///
    /// A broken streak is never scolded.
    pub fn encouragement(&self) -> String {
        match self.current_streak {
            0 => "Ready when you are. Starting again is part of continuing.".to_string(),
            1 => "Day one done. That's how every streak starts.".to_string(),
            2 => "Two days in a row. Keep the momentum going.".to_string(),
            3..=6 => format!(
                "{} days running. It's turning into a habit.",
                self.current_streak
            ),
            7..=29 => format!(
                "{} days straight. This is becoming second nature.",
                self.current_streak
            ),
            _ => format!(
                "{} days of consistency. Remarkable commitment!",
                self.current_streak
            ),
        }
    }
}
