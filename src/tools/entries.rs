//! Daily entry tools

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{calendar, DomainError, EntryStatus};
use crate::storage::DocumentStore;
use crate::tools::{date_or_today, habit_id, ToolResponse};
use crate::{HabitLedger, LedgerError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntryRecordParams {
    pub habit_id: String,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    pub date: Option<String>,
    /// "done", "rest" or "miss"; true/false for check habits; 0-10 for score habits
    pub status: Value,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntryGetParams {
    pub habit_id: String,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntryRangeParams {
    pub habit_id: String,
    /// First date, YYYY-MM-DD
    pub start: String,
    /// Last date (inclusive), defaults to today
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntriesClearParams {
    /// Must be true; clearing cannot be undone
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompactParams {}

pub fn record<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: EntryRecordParams,
) -> Result<ToolResponse, LedgerError> {
    let id = habit_id(&params.habit_id)?;
    let date = date_or_today(params.date.as_deref())?;
    let status = EntryStatus::from_value(&params.status)?;

    let entry = ledger.record_entry(&id, date, status, params.note.as_deref().unwrap_or(""))?;
    let streak = ledger.current_streak(&id, date)?;

    let mut message = format!("📝 Recorded {} for {}", entry.status, calendar::iso_date_key(date));
    if streak > 0 {
        message.push_str(&format!("\n🔥 Current streak: {} days", streak));
    }

    ToolResponse::new(message, json!({ "entry": entry, "currentStreak": streak }))
}

pub fn get<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: EntryGetParams,
) -> Result<ToolResponse, LedgerError> {
    let id = habit_id(&params.habit_id)?;
    let date = date_or_today(params.date.as_deref())?;

    match ledger.get_entry(&id, date) {
        Some(entry) => {
            let mut message = format!("{}: {}", calendar::iso_date_key(date), entry.status);
            if entry.has_note() {
                message.push_str(&format!(" ({})", entry.note));
            }
            ToolResponse::new(message, &entry)
        }
        None => ToolResponse::new(
            format!("No entry on {}", calendar::iso_date_key(date)),
            Value::Null,
        ),
    }
}

pub fn range<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: EntryRangeParams,
) -> Result<ToolResponse, LedgerError> {
    let id = habit_id(&params.habit_id)?;
    let start = calendar::parse_date(&params.start)?;
    let end = date_or_today(params.end.as_deref())?;

    let entries = ledger.entries_in_range(&id, start, end);
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {}", calendar::iso_date_key(e.date), e.status))
        .collect();
    let message = if lines.is_empty() {
        "No entries in that range".to_string()
    } else {
        lines.join("\n")
    };

    ToolResponse::new(message, json!({ "entries": entries }))
}

pub fn clear<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: EntriesClearParams,
) -> Result<ToolResponse, LedgerError> {
    if !params.confirm {
        return Err(DomainError::Validation {
            message: "Clearing all entries needs confirm: true".to_string(),
        }
        .into());
    }

    let removed = ledger.clear_entries()?;
    ToolResponse::new(
        format!("🧨 Cleared {} entries", removed),
        json!({ "removed": removed }),
    )
}

pub fn compact<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    _params: CompactParams,
) -> Result<ToolResponse, LedgerError> {
    let removed = ledger.compact()?;
    ToolResponse::new(
        format!("🧹 Removed {} orphaned entries", removed),
        json!({ "removed": removed }),
    )
}
