//! Streak, grid and day mode tools

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::analytics::HabitReport;
use crate::domain::{calendar, EntryStatus, HabitId};
use crate::storage::DocumentStore;
use crate::tools::{date_or_today, habit_id, ToolResponse};
use crate::{HabitLedger, LedgerError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitReportParams {
    /// One habit; all habits when omitted
    #[serde(default)]
    pub habit_id: Option<String>,
    /// Last day of the window, defaults to today
    #[serde(default)]
    pub end: Option<String>,
    /// Window length in days, defaults to the configured window
    #[serde(default)]
    pub window_days: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusGridParams {
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub window_days: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DayModeParams {
    /// Defaults to today
    #[serde(default)]
    pub date: Option<String>,
    /// Score habits to combine; every score habit when empty
    #[serde(default)]
    pub habit_ids: Vec<String>,
}

fn render_report(report: &HabitReport) -> String {
    let s = &report.summary;
    format!(
        "🎯 **{}**\n   🔥 Streak: {} | 🏆 Best: {} | 📊 Rate: {:.1}% ({} of {} days)\n   {}",
        report.name,
        s.current_streak,
        s.max_streak,
        s.completion_rate,
        s.done_count,
        s.window_days,
        report.encouragement
    )
}

pub fn habit_report<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: HabitReportParams,
) -> Result<ToolResponse, LedgerError> {
    let end = date_or_today(params.end.as_deref())?;

    let reports = match params.habit_id.as_deref() {
        Some(id) => vec![ledger.habit_report(&habit_id(id)?, end, params.window_days)?],
        None => ledger.habit_reports(end, params.window_days)?,
    };

    let message = if reports.is_empty() {
        "No habits yet. Add your first habit to get started!".to_string()
    } else {
        reports.iter().map(render_report).collect::<Vec<_>>().join("\n\n")
    };

    ToolResponse::new(message, json!({ "reports": reports }))
}

pub fn status_grid<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: StatusGridParams,
) -> Result<ToolResponse, LedgerError> {
    let end = date_or_today(params.end.as_deref())?;
    let grid = ledger.status_grid(end, params.window_days)?;

    let header: Vec<String> = grid.dates.iter().map(|d| d.format("%m/%d").to_string()).collect();
    let mut lines = vec![
        format!("Week {}", calendar::iso_week_key(end)),
        format!("| Habit | {} |", header.join(" | ")),
    ];
    for row in &grid.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match cell {
                Some(EntryStatus::Mark(mark)) => mark.glyph().to_string(),
                Some(EntryStatus::Score(score)) => score.to_string(),
                None => "·".to_string(),
            })
            .collect();
        lines.push(format!("| {} | {} |", row.name, cells.join(" | ")));
    }

    ToolResponse::new(lines.join("\n"), &grid)
}

pub fn day_mode<S: DocumentStore>(
    ledger: &HabitLedger<S>,
    params: DayModeParams,
) -> Result<ToolResponse, LedgerError> {
    let date = date_or_today(params.date.as_deref())?;
    let ids = params
        .habit_ids
        .iter()
        .map(|id| habit_id(id))
        .collect::<Result<Vec<HabitId>, _>>()?;

    let reading = ledger.day_mode(&ids, date)?;
    let message = match reading.average {
        Some(average) => format!(
            "Mode: {} (average {:.1})\n{}",
            reading.mode.as_str(),
            average,
            reading.mode.advice()
        ),
        None => format!(
            "Mode: {} ({} scores missing)\n{}",
            reading.mode.as_str(),
            reading.missing,
            reading.mode.advice()
        ),
    };

    ToolResponse::new(message, &reading)
}
