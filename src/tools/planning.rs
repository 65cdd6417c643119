//! Day plan and countdown tools
//!
//! Pure calculations; neither touches the store.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{calendar, DayPlan, DomainError, TimeBlock};
use crate::tools::ToolResponse;
use crate::LedgerError;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlanCheckParams {
    pub blocks: Vec<TimeBlock>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CountdownParams {
    /// End instant, RFC 3339 (e.g. 2025-06-01T09:30:00Z)
    pub end: String,
    /// Current instant, RFC 3339; defaults to now
    #[serde(default)]
    pub now: Option<String>,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DomainError::InvalidDate(format!("'{}': {}", s, e)).into())
}

pub fn plan_check(params: PlanCheckParams) -> Result<ToolResponse, LedgerError> {
    let plan = DayPlan::new(params.blocks);
    let conflicts = plan.conflicts();

    let mut lines: Vec<String> = plan
        .blocks
        .iter()
        .map(|b| format!("{} {} ({} min)", b.start, b.title, b.minutes))
        .collect();
    for conflict in &conflicts {
        lines.push(format!(
            "⚠️ '{}' starts at {} before '{}' ends",
            conflict.later, conflict.at, conflict.earlier
        ));
    }
    for block in &plan.invalid {
        if block.start_minute().is_some() {
            lines.push(format!("❓ '{}' is too long ({} min)", block.title, block.minutes));
        } else {
            lines.push(format!("❓ '{}' has an unreadable start '{}'", block.title, block.start));
        }
    }
    if conflicts.is_empty() && plan.invalid.is_empty() {
        lines.push("No overlaps".to_string());
    }

    ToolResponse::new(
        lines.join("\n"),
        json!({
            "blocks": plan.blocks,
            "invalid": plan.invalid,
            "conflicts": conflicts,
            "totalMinutes": plan.total_minutes(),
        }),
    )
}

pub fn countdown(params: CountdownParams) -> Result<ToolResponse, LedgerError> {
    let end = parse_instant(&params.end)?;
    let now = match params.now.as_deref() {
        Some(now) => parse_instant(now)?,
        None => Utc::now(),
    };

    let remaining = calendar::time_remaining(end, now);
    let display = calendar::format_countdown(remaining);
    let finished = remaining.num_seconds() == 0;

    let message = if finished {
        "⏰ Time's up".to_string()
    } else {
        format!("⏳ {} remaining", display)
    };

    ToolResponse::new(
        message,
        json!({
            "remainingSeconds": remaining.num_seconds(),
            "display": display,
            "finished": finished,
        }),
    )
}
