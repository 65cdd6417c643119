//! Day mode classification
//!
//! Averages same-day scores (energy, focus, mood and the like) and sorts the
//! day into a coarse bucket. Partial data is never averaged: if any required
//! score is missing the day is undetermined.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::SCORE_MAX;

/// Coarse classification of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    /// Push forward on something that matters
    High,
    /// Make small progress and keep things in order
    Medium,
    /// Rest and recover
    Low,
    /// Not every required score has been recorded
    Undetermined,
}

impl DayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayMode::High => "high",
            DayMode::Medium => "medium",
            DayMode::Low => "low",
            DayMode::Undetermined => "undetermined",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            DayMode::High => "Energy is high. Pick one forward task and go for it.",
            DayMode::Medium => "Average to slightly low. Move in small steps and keep things tidy.",
            DayMode::Low => "Running low. Rest, sort, sleep. Recovering is progress too.",
            DayMode::Undetermined => "Not enough scores yet. Record the rest to see today's mode.",
        }
    }
}

/// Averages at or above `high` are high, at or above `medium` are medium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayModeThresholds {
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_medium")]
    pub medium: f64,
}

fn default_high() -> f64 {
    7.0
}
fn default_medium() -> f64 {
    4.5
}

impl Default for DayModeThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
        }
    }
}

impl DayModeThresholds {
    pub fn validate(&self) -> Result<(), DomainError> {
        let max = f64::from(SCORE_MAX);
        let in_range = |v: f64| (0.0..=max).contains(&v);

        if !in_range(self.high) || !in_range(self.medium) {
            return Err(DomainError::Validation {
                message: format!("Day mode thresholds must be within 0..={}", SCORE_MAX),
            });
        }
        if self.medium > self.high {
            return Err(DomainError::Validation {
                message: format!(
                    "Medium threshold {} cannot exceed high threshold {}",
                    self.medium, self.high
                ),
            });
        }
        Ok(())
    }

    pub fn classify_average(&self, average: f64) -> DayMode {
        if average >= self.high {
            DayMode::High
        } else if average >= self.medium {
            DayMode::Medium
        } else {
            DayMode::Low
        }
    }
}

/// Result of classifying one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayModeReading {
    pub mode: DayMode,
    /// Mean of the scores; absent when undetermined
    pub average: Option<f64>,
    /// How many required scores were missing
    pub missing: usize,
}

/// Classify a day from its required scores
///
/// `scores` holds one slot per required score, `None` where nothing was
/// recorded. An empty slice is undetermined.
pub fn classify(scores: &[Option<u8>], thresholds: &DayModeThresholds) -> DayModeReading {
    let missing = scores.iter().filter(|s| s.is_none()).count();

    if scores.is_empty() || missing > 0 {
        return DayModeReading {
            mode: DayMode::Undetermined,
            average: None,
            missing,
        };
    }

    let sum: f64 = scores.iter().flatten().map(|s| f64::from(*s)).sum();
    let average = sum / scores.len() as f64;

    DayModeReading {
        mode: thresholds.classify_average(average),
        average: Some(average),
        missing: 0,
    }
}
