//! Core types shared by the habit, entry and obligation entities
//!
//! Identifiers, the per-habit status kinds and the status values that a
//! daily entry can carry, and the recurrence kinds used by reminders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::DomainError;

/// Lowest score a score habit accepts
pub const SCORE_MIN: u8 = 0;
/// Highest score a score habit accepts
pub const SCORE_MAX: u8 = 10;

/// Stable identifier for a habit
///
/// Stays the same across renames, so entries keyed by it remain attached to
/// the right habit. New ids are random UUIDs, but ids loaded from older
/// documents are kept verbatim even when they are not UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a fresh random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Name-based id for a stored habit that never had one; the same seed
    /// always yields the same id
    pub fn derived(seed: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("habit:{}", seed).as_bytes()).to_string())
    }

    /// Wrap an id received from a caller or a stored document
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::UnknownHabit("(empty id)".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier for a recurring obligation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObligationId(String);

impl ObligationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn derived(seed: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("obligation:{}", seed).as_bytes()).to_string())
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::UnknownObligation("(empty id)".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObligationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of daily marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Completed the habit that day
    Done,
    /// Deliberate day off; not penalized, but does not extend a streak
    Rest,
    /// Skipped or failed
    Miss,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Done => "done",
            Mark::Rest => "rest",
            Mark::Miss => "miss",
        }
    }

    /// Single-glyph rendering used in status grids
    pub fn glyph(&self) -> &'static str {
        match self {
            Mark::Done => "✅",
            Mark::Rest => "💤",
            Mark::Miss => "❌",
        }
    }
}

impl FromStr for Mark {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "done" => Ok(Mark::Done),
            "rest" => Ok(Mark::Rest),
            "miss" => Ok(Mark::Miss),
            other => Err(DomainError::InvalidStatus(format!(
                "'{}' is not one of done, rest, miss",
                other
            ))),
        }
    }
}

/// The value recorded for a habit on one day
///
/// Serialized untagged: marks as their lowercase name, scores as a bare
/// number. That is also the shape older documents used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryStatus {
    Mark(Mark),
    Score(u8),
}

impl EntryStatus {
    pub const DONE: EntryStatus = EntryStatus::Mark(Mark::Done);
    pub const REST: EntryStatus = EntryStatus::Mark(Mark::Rest);
    pub const MISS: EntryStatus = EntryStatus::Mark(Mark::Miss);

    /// Parse a status from loosely typed JSON input
    ///
    /// Strings name a mark, integers are scores, and booleans are the
    /// check-habit shorthand for done/miss. Range checks against a habit's
    /// kind happen later, in [`StatusKind::validate`].
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::String(s) => s.parse::<Mark>().map(EntryStatus::Mark),
            Value::Bool(true) => Ok(Self::DONE),
            Value::Bool(false) => Ok(Self::MISS),
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .map(EntryStatus::Score)
                .ok_or_else(|| {
                    DomainError::InvalidStatus(format!(
                        "score {} is outside {}..={}",
                        n, SCORE_MIN, SCORE_MAX
                    ))
                }),
            other => Err(DomainError::InvalidStatus(format!(
                "unsupported status value {}",
                other
            ))),
        }
    }

    pub fn label(&self) -> String {
        match self {
            EntryStatus::Mark(mark) => mark.as_str().to_string(),
            EntryStatus::Score(score) => score.to_string(),
        }
    }

    pub fn score(&self) -> Option<u8> {
        match self {
            EntryStatus::Score(score) => Some(*score),
            EntryStatus::Mark(_) => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Which statuses a habit accepts, chosen when the habit is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusKind {
    /// done / rest / miss
    #[default]
    Marks,
    /// Boolean habits: done / miss only
    Check,
    /// Numeric score in 0..=10; scores at or above `done_at` count as done
    Score { done_at: u8 },
}

impl StatusKind {
    /// Build a status kind from its name as given by a caller
    pub fn parse(name: &str, done_at: u8) -> Result<Self, DomainError> {
        let kind = match name.trim().to_lowercase().as_str() {
            "marks" | "mark" => StatusKind::Marks,
            "check" | "bool" | "boolean" => StatusKind::Check,
            "score" => StatusKind::Score { done_at },
            other => {
                return Err(DomainError::Validation {
                    message: format!(
                        "Unknown status kind '{}'. Valid options: marks, check, score",
                        other
                    ),
                })
            }
        };
        kind.check()?;
        Ok(kind)
    }

    /// Reject a score threshold outside the score range
    pub fn check(&self) -> Result<(), DomainError> {
        if let StatusKind::Score { done_at } = self {
            if *done_at > SCORE_MAX {
                return Err(DomainError::Validation {
                    message: format!(
                        "Score threshold must be within {}..={}, got {}",
                        SCORE_MIN, SCORE_MAX, done_at
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Marks => "marks",
            StatusKind::Check => "check",
            StatusKind::Score { .. } => "score",
        }
    }

    /// Check that a status is one this kind accepts
    pub fn validate(&self, status: &EntryStatus) -> Result<(), DomainError> {
        match (self, status) {
            (StatusKind::Marks, EntryStatus::Mark(_)) => Ok(()),
            (StatusKind::Check, EntryStatus::Mark(Mark::Done | Mark::Miss)) => Ok(()),
            (StatusKind::Check, EntryStatus::Mark(Mark::Rest)) => Err(DomainError::InvalidStatus(
                "check habits accept only done or miss".to_string(),
            )),
            (StatusKind::Score { .. }, EntryStatus::Score(score)) => {
                if *score > SCORE_MAX {
                    Err(DomainError::InvalidStatus(format!(
                        "score {} is outside {}..={}",
                        score, SCORE_MIN, SCORE_MAX
                    )))
                } else {
                    Ok(())
                }
            }
            (StatusKind::Score { .. }, EntryStatus::Mark(mark)) => Err(DomainError::InvalidStatus(
                format!("score habits need a number, got '{}'", mark.as_str()),
            )),
            (_, EntryStatus::Score(score)) => Err(DomainError::InvalidStatus(format!(
                "{} habits do not take scores, got {}",
                self.name(),
                score
            ))),
        }
    }

    /// Whether a status counts as a completion for streaks and rates
    pub fn qualifies(&self, status: &EntryStatus) -> bool {
        match (self, status) {
            (_, EntryStatus::Mark(Mark::Done)) => true,
            (StatusKind::Score { done_at }, EntryStatus::Score(score)) => score >= done_at,
            _ => false,
        }
    }
}

/// How a recurring obligation repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// One-off: the anchor date is the only occurrence
    #[serde(alias = "once")]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "once" | "one-off" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "yearly" | "annual" => Ok(RecurrenceKind::Yearly),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid recurrence '{}'. Valid options: none, daily, weekly, monthly, yearly",
                    other
                ),
            }),
        }
    }
}
