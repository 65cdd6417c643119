//! Day plans made of timed blocks
//!
//! Blocks are placed by start time (`HH:MM`) and length in minutes. The plan
//! is ordered by start time and overlapping blocks are reported as
//! conflicts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A scheduled block of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeBlock {
    pub title: String,
    /// Start time as `HH:MM`
    pub start: String,
    pub minutes: u32,
}

impl TimeBlock {
    pub fn start_minute(&self) -> Option<u32> {
        parse_hhmm(&self.start)
    }

    /// End in minutes from midnight; may pass 24:00, `None` when the start
    /// is malformed or the length overflows
    pub fn end_minute(&self) -> Option<u32> {
        self.start_minute()?.checked_add(self.minutes)
    }
}

/// Minutes since midnight for `HH:MM`, or `None` if malformed
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (hh, mm) = s.trim().split_once(':')?;
    let hh: u32 = hh.parse().ok()?;
    let mm: u32 = mm.parse().ok()?;
    if hh <= 23 && mm <= 59 {
        Some(hh * 60 + mm)
    } else {
        None
    }
}

/// `HH:MM` for minutes since midnight, wrapping past 24:00
pub fn format_hhmm(total_minutes: u32) -> String {
    let wrapped = total_minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Two blocks whose times overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The block that started earlier
    pub earlier: String,
    pub later: String,
    /// When the later block starts
    pub at: String,
}

/// A day's blocks, ordered by start time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Blocks with a valid start, earliest first
    pub blocks: Vec<TimeBlock>,
    /// Blocks whose start could not be parsed or whose end overflows, in input order
    pub invalid: Vec<TimeBlock>,
}

impl DayPlan {
    pub fn new(blocks: Vec<TimeBlock>) -> Self {
        let (mut valid, invalid): (Vec<TimeBlock>, Vec<TimeBlock>) =
            blocks.into_iter().partition(|b| b.end_minute().is_some());
        // Stable sort keeps input order among blocks with equal starts
        valid.sort_by_key(|b| b.start_minute().unwrap_or(u32::MAX));

        Self {
            blocks: valid,
            invalid,
        }
    }

    /// Blocks that start before an earlier block has finished
    ///
    /// Each block is compared with the running latest end time, so a long
    /// block conflicts with every block it covers. The conflict names the
    /// immediately preceding block.
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        let mut latest_end: Option<u32> = None;
        let mut previous: Option<&TimeBlock> = None;

        for block in &self.blocks {
            let (Some(start), Some(end)) = (block.start_minute(), block.end_minute()) else {
                continue;
            };

            if let (Some(prev_end), Some(prev)) = (latest_end, previous) {
                if start < prev_end {
                    conflicts.push(Conflict {
                        earlier: prev.title.clone(),
                        later: block.title.clone(),
                        at: format_hhmm(start),
                    });
                }
            }

            latest_end = Some(latest_end.map_or(end, |e| e.max(end)));
            previous = Some(block);
        }

        conflicts
    }

    /// Total planned minutes across valid blocks
    pub fn total_minutes(&self) -> u32 {
        self.blocks
            .iter()
            .fold(0u32, |total, b| total.saturating_add(b.minutes))
    }
}
