//! Habit definition entity
//!
//! A habit is a named thing the user tracks day by day. Its id never
//! changes, its name can be renamed, and its status kind decides which daily
//! statuses it accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, StatusKind};

/// Longest habit name accepted, in characters
pub const MAX_HABIT_NAME_CHARS: usize = 100;

/// Something the user wants to do regularly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDefinition {
    /// Stable identifier, unaffected by renames
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read 30min")
    pub name: String,
    /// Which statuses this habit accepts
    #[serde(default)]
    pub status_kind: StatusKind,
    /// When this habit was created; never modified
    pub created_at: DateTime<Utc>,
}

impl HabitDefinition {
    /// Create a new habit with a fresh id
    ///
    /// The name is trimmed before it is validated and stored.
    pub fn new(name: &str, status_kind: StatusKind) -> Result<Self, DomainError> {
        let name = Self::validate_name(name)?;
        status_kind.check()?;

        Ok(Self {
            id: HabitId::new(),
            name,
            status_kind,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a habit from stored data
    ///
    /// Assumes the storage layer has already normalized the fields.
    pub fn from_existing(
        id: HabitId,
        name: String,
        status_kind: StatusKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            status_kind,
            created_at,
        }
    }

    /// Change the display name; the id stays the same
    pub fn rename(&mut self, new_name: &str) -> Result<(), DomainError> {
        self.name = Self::validate_name(new_name)?;
        Ok(())
    }

    /// Trim and validate a habit name, returning the trimmed form
    pub fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > MAX_HABIT_NAME_CHARS {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_HABIT_NAME_CHARS
            )));
        }

        Ok(trimmed.to_string())
    }
}
