//! Recurring obligations and next-occurrence math
//!
//! An obligation (a bill, a subscription, a monthly goal) has an anchor date
//! and a recurrence. Its next occurrence and the days until it are always
//! derived relative to a reference date and never stored.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::{self, add_months_clamped};
use crate::domain::{DomainError, ObligationId, RecurrenceKind};

/// A dated obligation that may repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringObligation {
    pub id: ObligationId,
    pub name: String,
    /// Optional amount in the smallest currency unit the user thinks in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub anchor_date: NaiveDate,
    pub recurrence: RecurrenceKind,
    pub created_at: DateTime<Utc>,
}

impl RecurringObligation {
    /// Create an obligation; a malformed anchor date fails here, not later
    pub fn new(
        name: &str,
        amount: Option<u64>,
        anchor_date: &str,
        recurrence: RecurrenceKind,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation {
                message: "Obligation name cannot be empty".to_string(),
            });
        }
        let anchor_date = calendar::parse_date(anchor_date)?;

        Ok(Self {
            id: ObligationId::new(),
            name: name.to_string(),
            amount,
            anchor_date,
            recurrence,
            created_at: Utc::now(),
        })
    }

    /// First occurrence on or after `reference` (the anchor for one-offs)
    pub fn next_occurrence(&self, reference: NaiveDate) -> NaiveDate {
        next_occurrence(self.anchor_date, self.recurrence, reference)
    }

    /// The next occurrence as seen from `reference`
    pub fn occurrence(&self, reference: NaiveDate, windows: &ReminderWindows) -> Occurrence {
        let date = self.next_occurrence(reference);
        let days_until = days_until(date, reference);

        Occurrence {
            obligation_id: self.id.clone(),
            name: self.name.clone(),
            amount: self.amount,
            recurrence: self.recurrence,
            date,
            days_until,
            urgency: windows.urgency(days_until),
        }
    }
}

/// Next occurrence of an anchored recurrence relative to a reference date
///
/// - `None` returns the anchor unchanged, even when it is in the past.
/// - `Daily`/`Weekly` step by 1 or 7 days.
/// - `Monthly`/`Yearly` take the k-th occurrence as `anchor + k months`
///   (or `12k`), always measured from the anchor and clamped to the last day
///   of a shorter month. A Jan 31 anchor therefore yields Feb 28, then
///   Mar 31, never Mar 28.
///
/// Recurring kinds return the smallest occurrence `>= reference`; an anchor
/// already on or after the reference is returned as is.
pub fn next_occurrence(anchor: NaiveDate, kind: RecurrenceKind, reference: NaiveDate) -> NaiveDate {
    if anchor >= reference {
        return anchor;
    }

    match kind {
        RecurrenceKind::None => anchor,
        RecurrenceKind::Daily => reference,
        RecurrenceKind::Weekly => {
            let behind = calendar::days_between(anchor, reference);
            let weeks = (behind + 6) / 7;
            anchor + Duration::days(weeks * 7)
        }
        RecurrenceKind::Monthly => advance_months(anchor, 1, reference),
        RecurrenceKind::Yearly => advance_months(anchor, 12, reference),
    }
}

/// Smallest `anchor + k * step` months that is `>= reference`
fn advance_months(anchor: NaiveDate, step: u32, reference: NaiveDate) -> NaiveDate {
    use chrono::Datelike;

    let months_apart = (reference.year() - anchor.year()) * 12
        + reference.month() as i32
        - anchor.month() as i32;
    // Start one step early; clamping can land the estimate before the reference
    let mut k = (months_apart.max(0) as u32 / step).saturating_sub(1);

    loop {
        match add_months_clamped(anchor, k * step) {
            Some(candidate) if candidate >= reference => return candidate,
            Some(_) => k += 1,
            // Past the end of the representable calendar
            None => return NaiveDate::MAX,
        }
    }
}

/// Whole days from `reference` to `occurrence`; negative means overdue
pub fn days_until(occurrence: NaiveDate, reference: NaiveDate) -> i64 {
    calendar::days_between(reference, occurrence)
}

/// How soon an occurrence is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Overdue or due within the urgent window
    Urgent,
    Soon,
    Later,
}

impl Urgency {
    pub fn glyph(&self) -> &'static str {
        match self {
            Urgency::Urgent => "🔴",
            Urgency::Soon => "🟡",
            Urgency::Later => "🟢",
        }
    }
}

/// Day windows used to bucket reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderWindows {
    #[serde(default = "default_urgent_within_days")]
    pub urgent_within_days: i64,
    #[serde(default = "default_soon_within_days")]
    pub soon_within_days: i64,
    /// Length of one planning horizon; totals cover this one and the next
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
}

fn default_urgent_within_days() -> i64 {
    3
}
fn default_soon_within_days() -> i64 {
    7
}
fn default_horizon_days() -> i64 {
    30
}

impl Default for ReminderWindows {
    fn default() -> Self {
        Self {
            urgent_within_days: default_urgent_within_days(),
            soon_within_days: default_soon_within_days(),
            horizon_days: default_horizon_days(),
        }
    }
}

impl ReminderWindows {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.urgent_within_days < 0 || self.urgent_within_days > self.soon_within_days {
            return Err(DomainError::Validation {
                message: "Reminder windows need 0 <= urgent_within_days <= soon_within_days"
                    .to_string(),
            });
        }
        if self.horizon_days <= 0 {
            return Err(DomainError::Validation {
                message: "Reminder horizon must be at least one day".to_string(),
            });
        }
        Ok(())
    }

    pub fn urgency(&self, days_until: i64) -> Urgency {
        if days_until <= self.urgent_within_days {
            Urgency::Urgent
        } else if days_until <= self.soon_within_days {
            Urgency::Soon
        } else {
            Urgency::Later
        }
    }
}

/// One obligation's next occurrence, as seen from a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub obligation_id: ObligationId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub recurrence: RecurrenceKind,
    pub date: NaiveDate,
    pub days_until: i64,
    pub urgency: Urgency,
}

/// Upcoming occurrences with amount totals per horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub reference: NaiveDate,
    /// Sorted by `days_until`, soonest (or most overdue) first
    pub occurrences: Vec<Occurrence>,
    /// Sum of amounts due within the first horizon, overdue included
    pub due_this_horizon: u64,
    /// Sum of amounts due in the horizon after that
    pub due_next_horizon: u64,
}

impl ReminderSummary {
    pub fn build(
        obligations: &[RecurringObligation],
        reference: NaiveDate,
        windows: &ReminderWindows,
    ) -> Self {
        let mut occurrences: Vec<Occurrence> = obligations
            .iter()
            .map(|o| o.occurrence(reference, windows))
            .collect();
        occurrences.sort_by(|a, b| a.days_until.cmp(&b.days_until).then_with(|| a.name.cmp(&b.name)));

        let horizon = windows.horizon_days;
        let mut due_this_horizon = 0u64;
        let mut due_next_horizon = 0u64;
        for occurrence in &occurrences {
            let amount = occurrence.amount.unwrap_or(0);
            if occurrence.days_until <= horizon {
                due_this_horizon = due_this_horizon.saturating_add(amount);
            } else if occurrence.days_until <= horizon * 2 {
                due_next_horizon = due_next_horizon.saturating_add(amount);
            }
        }

        Self {
            reference,
            occurrences,
            due_this_horizon,
            due_next_horizon,
        }
    }
}
