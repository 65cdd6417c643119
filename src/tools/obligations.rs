//! Recurring obligation tools

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{calendar, ObligationId, RecurrenceKind};
use crate::storage::DocumentStore;
use crate::tools::{date_or_today, ToolResponse};
use crate::{HabitLedger, LedgerError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ObligationAddParams {
    pub name: String,
    /// Optional amount, in whole currency units
    #[serde(default)]
    pub amount: Option<u64>,
    /// First due date, YYYY-MM-DD
    pub anchor_date: String,
    /// none (default), daily, weekly, monthly or yearly
    #[serde(default)]
    pub recurrence: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ObligationRemoveParams {
    pub obligation_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ObligationUpcomingParams {
    /// Date to measure from, defaults to today
    #[serde(default)]
    pub reference: Option<String>,
}

pub fn add<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: ObligationAddParams,
) -> Result<ToolResponse, LedgerError> {
    let recurrence = match params.recurrence.as_deref() {
        Some(kind) => kind.parse::<RecurrenceKind>()?,
        None => RecurrenceKind::None,
    };

    let obligation =
        ledger.add_obligation(&params.name, params.amount, &params.anchor_date, recurrence)?;
    ToolResponse::new(
        format!(
            "📅 Added '{}' ({}) from {}\nObligation ID: {}",
            obligation.name,
            obligation.recurrence.as_str(),
            calendar::iso_date_key(obligation.anchor_date),
            obligation.id
        ),
        &obligation,
    )
}

pub fn remove<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: ObligationRemoveParams,
) -> Result<ToolResponse, LedgerError> {
    let id = ObligationId::parse(&params.obligation_id)?;
    let removed = ledger.remove_obligation(&id)?;
    ToolResponse::new(format!("🗑️ Removed '{}'", removed.name), &removed)
}

pub fn upcoming<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: ObligationUpcomingParams,
) -> Result<ToolResponse, LedgerError> {
    let reference = date_or_today(params.reference.as_deref())?;
    let summary = ledger.reminder_summary(reference);

    if summary.occurrences.is_empty() {
        return ToolResponse::new("Nothing scheduled", json!(summary));
    }

    let mut lines: Vec<String> = summary
        .occurrences
        .iter()
        .map(|o| {
            let when = if o.days_until < 0 {
                format!("{} days overdue", -o.days_until)
            } else {
                format!("in {} days", o.days_until)
            };
            let amount = o.amount.map(|a| format!(" {}", a)).unwrap_or_default();
            format!(
                "{} {} {}{} ({})",
                o.urgency.glyph(),
                calendar::iso_date_key(o.date),
                o.name,
                amount,
                when
            )
        })
        .collect();

    let horizon = ledger.config().reminders.horizon_days;
    lines.push(String::new());
    lines.push(format!(
        "Due within {} days: {} | next {} days: {}",
        horizon, summary.due_this_horizon, horizon, summary.due_next_horizon
    ));

    ToolResponse::new(lines.join("\n"), &summary)
}
