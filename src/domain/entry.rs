//! Daily entry entity
//!
//! One entry records what happened with one habit on one calendar date.
//! `(date, habit_id)` is the identity: writing the same pair again replaces
//! the entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, EntryStatus, HabitDefinition, HabitId};

/// Longest note accepted, in characters
pub const MAX_NOTE_CHARS: usize = 500;

/// A habit's status on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub status: EntryStatus,
    /// Free text; has no effect on any computation
    pub note: String,
    /// Time of the last write. Absent only on rows migrated from documents
    /// that never stored it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// The stored part of an entry; the date and habit id are its document keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub status: EntryStatus,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl DailyEntry {
    /// Create an entry for a habit, validating the status against its kind
    ///
    /// `saved_at` is stamped with the current time.
    pub fn for_habit(
        habit: &HabitDefinition,
        date: NaiveDate,
        status: EntryStatus,
        note: &str,
    ) -> Result<Self, DomainError> {
        habit.status_kind.validate(&status)?;
        let note = Self::validate_note(note)?;

        Ok(Self {
            habit_id: habit.id.clone(),
            date,
            status,
            note,
            saved_at: Some(Utc::now()),
        })
    }

    /// Reassemble an entry from its document keys and stored record
    pub fn from_record(habit_id: HabitId, date: NaiveDate, record: &EntryRecord) -> Self {
        Self {
            habit_id,
            date,
            status: record.status,
            note: record.note.clone(),
            saved_at: record.saved_at,
        }
    }

    /// The part of this entry that is stored under its keys
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            status: self.status,
            note: self.note.clone(),
            saved_at: self.saved_at,
        }
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    fn validate_note(note: &str) -> Result<String, DomainError> {
        let trimmed = note.trim();
        if trimmed.chars().count() > MAX_NOTE_CHARS {
            return Err(DomainError::Validation {
                message: format!("Notes cannot be longer than {} characters", MAX_NOTE_CHARS),
            });
        }
        Ok(trimmed.to_string())
    }
}
