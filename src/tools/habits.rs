//! Habit registry tools

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::domain::StatusKind;
use crate::storage::DocumentStore;
use crate::tools::{habit_id, ToolResponse};
use crate::{HabitLedger, LedgerError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitListParams {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitAddParams {
    /// Display name, unique among habits
    pub name: String,
    /// marks (default), check or score
    #[serde(default)]
    pub kind: Option<String>,
    /// For score habits: the lowest score that counts as done (default from config)
    #[serde(default)]
    pub done_at: Option<u8>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitRemoveParams {
    pub habit_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitRenameParams {
    pub habit_id: String,
    pub name: String,
}

pub fn list<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    _params: HabitListParams,
) -> Result<ToolResponse, LedgerError> {
    let habits = ledger.list_habits();

    let message = if habits.is_empty() {
        "No habits yet. Add your first habit to get started!".to_string()
    } else {
        let lines: Vec<String> = habits
            .iter()
            .map(|h| format!("🎯 **{}** ({}) [{}]", h.name, h.status_kind.name(), h.id))
            .collect();
        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines.join("\n"))
    };

    ToolResponse::new(message, json!({ "habits": habits }))
}

pub fn add<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: HabitAddParams,
) -> Result<ToolResponse, LedgerError> {
    let mut kind = ledger.status_kind(params.kind.as_deref().unwrap_or("marks"))?;
    if let (StatusKind::Score { .. }, Some(done_at)) = (kind, params.done_at) {
        kind = StatusKind::Score { done_at };
        kind.check()?;
    }

    let habit = ledger.add_habit_with_kind(&params.name, kind)?;
    ToolResponse::new(
        format!("✅ Added habit '{}'\nHabit ID: {}", habit.name, habit.id),
        &habit,
    )
}

pub fn remove<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: HabitRemoveParams,
) -> Result<ToolResponse, LedgerError> {
    let removed = ledger.remove_habit(&habit_id(&params.habit_id)?)?;
    ToolResponse::new(
        format!(
            "🗑️ Removed habit '{}' and {} entries",
            removed.habit.name, removed.entries_removed
        ),
        json!({ "habit": removed.habit, "entriesRemoved": removed.entries_removed }),
    )
}

pub fn rename<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: HabitRenameParams,
) -> Result<ToolResponse, LedgerError> {
    let habit = ledger.rename_habit(&habit_id(&params.habit_id)?, &params.name)?;
    ToolResponse::new(format!("✏️ Renamed habit to '{}'", habit.name), &habit)
}
