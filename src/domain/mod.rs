//! Domain module containing the core ledger types and pure algorithms
//!
//! Nothing in here touches storage. Entities (habits, daily entries,
//! recurring obligations) validate themselves on construction, and the
//! streak, day-mode and recurrence math are plain functions over dates.

pub mod calendar;
pub mod day_mode;
pub mod entry;
pub mod habit;
pub mod obligation;
pub mod plan;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use day_mode::*;
pub use entry::*;
pub use habit::*;
pub use obligation::*;
pub use plan::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors raised synchronously by domain operations
///
/// The presentation layer is expected to catch these and turn them into a
/// user-visible message. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("A habit named '{0}' already exists")]
    DuplicateName(String),

    #[error("Habit not found: {0}")]
    UnknownHabit(String),

    #[error("Obligation not found: {0}")]
    UnknownObligation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Validation error: {message}")]
    Validation { message: String },
}
