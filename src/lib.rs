//! Habit ledger: habit streaks, daily entries and recurring reminders
//!
//! The library is a small, stateless engine. Durable state lives behind a
//! [`DocumentStore`]; [`HabitLedger`] loads it per call, applies one
//! operation and returns structured values. The `habit-ledger` binary serves
//! the same operations as JSON-RPC tools over stdio.

use thiserror::Error;

pub mod analytics;
pub mod config;
pub mod domain;
pub mod entries;
pub mod ledger;
pub mod mcp;
pub mod registry;
pub mod reminders;
pub mod storage;
pub mod tools;

// Re-export the types most callers need
pub use analytics::{AnalyticsEngine, GridRow, HabitReport, StatusGrid};
pub use config::{Backend, ConfigError, LedgerConfig};
pub use domain::*;
pub use ledger::HabitLedger;
pub use registry::RemovedHabit;
pub use storage::{
    DocumentStore, JsonFileStore, MemoryStore, SqliteDocumentStore, StorageError, TrackerDocument,
};

/// Errors returned by ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("{0}")]
    Domain(#[from] domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
