//! Ledger operations exposed as JSON-RPC tools
//!
//! Each tool deserializes typed arguments, calls one [`HabitLedger`] method
//! and returns a short text rendering alongside the structured result. The
//! tools add no behavior of their own.

pub mod entries;
pub mod habits;
pub mod obligations;
pub mod planning;
pub mod reports;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{calendar, HabitId};
use crate::mcp::protocol::ToolDefinition;
use crate::storage::DocumentStore;
use crate::{HabitLedger, LedgerError};

/// What a tool hands back: text for people, data for programs
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub message: String,
    pub data: Value,
}

impl ToolResponse {
    pub fn new(message: impl Into<String>, data: impl Serialize) -> Result<Self, LedgerError> {
        Ok(Self {
            message: message.into(),
            data: serde_json::to_value(data)?,
        })
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

struct ToolSpec {
    name: &'static str,
    description: &'static str,
    schema: fn() -> schemars::schema::RootSchema,
}

fn schema_of<T: JsonSchema>() -> schemars::schema::RootSchema {
    schemars::schema_for!(T)
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "habit_list",
        description: "List all habits",
        schema: schema_of::<habits::HabitListParams>,
    },
    ToolSpec {
        name: "habit_add",
        description: "Add a habit. kind is marks (done/rest/miss), check (done/miss) or score (0-10)",
        schema: schema_of::<habits::HabitAddParams>,
    },
    ToolSpec {
        name: "habit_remove",
        description: "Remove a habit and every entry recorded for it",
        schema: schema_of::<habits::HabitRemoveParams>,
    },
    ToolSpec {
        name: "habit_rename",
        description: "Rename a habit; its history stays attached",
        schema: schema_of::<habits::HabitRenameParams>,
    },
    ToolSpec {
        name: "entry_record",
        description: "Record a habit's status for a date (defaults to today), replacing any earlier entry that day",
        schema: schema_of::<entries::EntryRecordParams>,
    },
    ToolSpec {
        name: "entry_get",
        description: "Get a habit's entry for a date",
        schema: schema_of::<entries::EntryGetParams>,
    },
    ToolSpec {
        name: "entry_range",
        description: "List a habit's entries between two dates, oldest first",
        schema: schema_of::<entries::EntryRangeParams>,
    },
    ToolSpec {
        name: "entries_clear",
        description: "Delete every entry of every habit (habits are kept). Requires confirm: true",
        schema: schema_of::<entries::EntriesClearParams>,
    },
    ToolSpec {
        name: "ledger_compact",
        description: "Drop entries left behind by removed habits",
        schema: schema_of::<entries::CompactParams>,
    },
    ToolSpec {
        name: "habit_report",
        description: "Current streak, longest streak and completion rate for one habit or all habits",
        schema: schema_of::<reports::HabitReportParams>,
    },
    ToolSpec {
        name: "status_grid",
        description: "Each habit's status on each day of a window",
        schema: schema_of::<reports::StatusGridParams>,
    },
    ToolSpec {
        name: "day_mode",
        description: "Classify a day as high, medium or low from its score habits",
        schema: schema_of::<reports::DayModeParams>,
    },
    ToolSpec {
        name: "obligation_add",
        description: "Add a dated obligation (bill, subscription, goal) that repeats none, daily, weekly, monthly or yearly",
        schema: schema_of::<obligations::ObligationAddParams>,
    },
    ToolSpec {
        name: "obligation_remove",
        description: "Remove an obligation",
        schema: schema_of::<obligations::ObligationRemoveParams>,
    },
    ToolSpec {
        name: "obligation_upcoming",
        description: "Next occurrence of every obligation, soonest first, with amount totals",
        schema: schema_of::<obligations::ObligationUpcomingParams>,
    },
    ToolSpec {
        name: "plan_check",
        description: "Order a day's time blocks and report overlaps",
        schema: schema_of::<planning::PlanCheckParams>,
    },
    ToolSpec {
        name: "countdown",
        description: "Time remaining until a fixed end time",
        schema: schema_of::<planning::CountdownParams>,
    },
];

/// Definitions for `tools/list`
pub fn definitions() -> Vec<ToolDefinition> {
    TOOLS
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            input_schema: serde_json::to_value((spec.schema)()).unwrap_or(Value::Null),
        })
        .collect()
}

/// Run one tool by name
pub fn call<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    name: &str,
    arguments: Value,
) -> Result<ToolResponse, ToolError> {
    let response = match name {
        "habit_list" => habits::list(ledger, parse_args(name, arguments)?)?,
        "habit_add" => habits::add(ledger, parse_args(name, arguments)?)?,
        "habit_remove" => habits::remove(ledger, parse_args(name, arguments)?)?,
        "habit_rename" => habits::rename(ledger, parse_args(name, arguments)?)?,
        "entry_record" => entries::record(ledger, parse_args(name, arguments)?)?,
        "entry_get" => entries::get(ledger, parse_args(name, arguments)?)?,
        "entry_range" => entries::range(ledger, parse_args(name, arguments)?)?,
        "entries_clear" => entries::clear(ledger, parse_args(name, arguments)?)?,
        "ledger_compact" => entries::compact(ledger, parse_args(name, arguments)?)?,
        "habit_report" => reports::habit_report(ledger, parse_args(name, arguments)?)?,
        "status_grid" => reports::status_grid(ledger, parse_args(name, arguments)?)?,
        "day_mode" => reports::day_mode(ledger, parse_args(name, arguments)?)?,
        "obligation_add" => obligations::add(ledger, parse_args(name, arguments)?)?,
        "obligation_remove" => obligations::remove(ledger, parse_args(name, arguments)?)?,
        "obligation_upcoming" => obligations::upcoming(ledger, parse_args(name, arguments)?)?,
        "plan_check" => planning::plan_check(parse_args(name, arguments)?)?,
        "countdown" => planning::countdown(parse_args(name, arguments)?)?,
        other => return Err(ToolError::UnknownTool(other.to_string())),
    };

    Ok(response)
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    // Clients may omit arguments entirely for parameterless tools
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };

    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn habit_id(s: &str) -> Result<HabitId, LedgerError> {
    Ok(HabitId::parse(s)?)
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today
pub(crate) fn date_or_today(s: Option<&str>) -> Result<NaiveDate, LedgerError> {
    Ok(calendar::parse_date_or(s, calendar::today())?)
}
