//! The habit ledger facade
//!
//! [`HabitLedger`] is the whole outward surface of the crate. It holds no
//! tracker state between calls: every call loads the documents it needs from
//! the store, normalizes them, reads or mutates them, saves if anything
//! changed, and returns plain values for the caller to render.

use chrono::NaiveDate;

use crate::analytics::{AnalyticsEngine, HabitReport, StatusGrid};
use crate::config::{LedgerConfig, MAX_WINDOW_DAYS};
use crate::domain::{
    DailyEntry, DayModeReading, DomainError, EntryStatus, HabitDefinition, HabitId, ObligationId,
    Occurrence, RecurrenceKind, RecurringObligation, ReminderSummary, StatusKind,
};
use crate::registry::RemovedHabit;
use crate::storage::{
    DocumentStore, ObligationBook, TrackerDocument, OBLIGATIONS_COLLECTION, TRACKER_COLLECTION,
};
use crate::{entries, registry, reminders, LedgerError};

pub struct HabitLedger<S: DocumentStore> {
    store: S,
    analytics: AnalyticsEngine,
    config: LedgerConfig,
}

impl<S: DocumentStore> HabitLedger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        let analytics = AnalyticsEngine::new(config.day_mode);
        Self {
            store,
            analytics,
            config,
        }
    }

    /// A ledger with default configuration
    pub fn with_store(store: S) -> Self {
        Self::new(store, LedgerConfig::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    /// Load and normalize the tracker document
    pub fn tracker(&self) -> TrackerDocument {
        TrackerDocument::from_document(&self.store.load(TRACKER_COLLECTION))
    }

    fn save_tracker(&self, tracker: &TrackerDocument) -> Result<(), LedgerError> {
        self.store.save(TRACKER_COLLECTION, &tracker.to_document()?)?;
        Ok(())
    }

    fn obligation_book(&self) -> ObligationBook {
        ObligationBook::from_document(&self.store.load(OBLIGATIONS_COLLECTION))
    }

    fn save_obligations(&self, book: &ObligationBook) -> Result<(), LedgerError> {
        self.store.save(OBLIGATIONS_COLLECTION, &book.to_document()?)?;
        Ok(())
    }

    /// Resolve an optional window length against the configured default
    fn window(&self, window_days: Option<u32>) -> Result<u32, LedgerError> {
        let days = window_days.unwrap_or(self.config.tracking.default_window_days);
        if days > MAX_WINDOW_DAYS {
            return Err(DomainError::Validation {
                message: format!("Window must be at most {} days, got {}", MAX_WINDOW_DAYS, days),
            }
            .into());
        }
        Ok(days)
    }

    /// Status kind for a new habit by name; score habits get the configured threshold
    pub fn status_kind(&self, name: &str) -> Result<StatusKind, LedgerError> {
        Ok(StatusKind::parse(name, self.config.tracking.score_done_at)?)
    }

    // Registry

    pub fn list_habits(&self) -> Vec<HabitDefinition> {
        registry::list_habits(&self.tracker()).to_vec()
    }

    /// Add a done/rest/miss habit
    pub fn add_habit(&self, name: &str) -> Result<HabitDefinition, LedgerError> {
        self.add_habit_with_kind(name, StatusKind::Marks)
    }

    pub fn add_habit_with_kind(
        &self,
        name: &str,
        status_kind: StatusKind,
    ) -> Result<HabitDefinition, LedgerError> {
        let mut tracker = self.tracker();
        let habit = registry::add_habit(&mut tracker, name, status_kind)?;
        self.save_tracker(&tracker)?;
        Ok(habit)
    }

    /// Remove a habit together with all of its entries
    pub fn remove_habit(&self, id: &HabitId) -> Result<RemovedHabit, LedgerError> {
        let mut tracker = self.tracker();
        let removed = registry::remove_habit(&mut tracker, id)?;
        self.save_tracker(&tracker)?;
        Ok(removed)
    }

    pub fn rename_habit(&self, id: &HabitId, new_name: &str) -> Result<HabitDefinition, LedgerError> {
        let mut tracker = self.tracker();
        let habit = registry::rename_habit(&mut tracker, id, new_name)?;
        self.save_tracker(&tracker)?;
        Ok(habit)
    }

    // Entries

    /// Record (or overwrite) a habit's status for a date
    pub fn record_entry(
        &self,
        id: &HabitId,
        date: NaiveDate,
        status: EntryStatus,
        note: &str,
    ) -> Result<DailyEntry, LedgerError> {
        let mut tracker = self.tracker();
        let entry = entries::record_entry(&mut tracker, id, date, status, note)?;
        self.save_tracker(&tracker)?;
        Ok(entry)
    }

    pub fn get_entry(&self, id: &HabitId, date: NaiveDate) -> Option<DailyEntry> {
        entries::get_entry(&self.tracker(), id, date)
    }

    pub fn entries_in_range(&self, id: &HabitId, start: NaiveDate, end: NaiveDate) -> Vec<DailyEntry> {
        entries::entries_in_range(&self.tracker(), id, start, end)
    }

    /// Delete every entry of every habit; habits are kept
    pub fn clear_entries(&self) -> Result<usize, LedgerError> {
        let mut tracker = self.tracker();
        let removed = entries::clear_entries(&mut tracker);
        self.save_tracker(&tracker)?;
        tracing::info!("Cleared all entries ({} removed)", removed);
        Ok(removed)
    }

    /// Drop stale entries left by habits that no longer exist
    pub fn compact(&self) -> Result<usize, LedgerError> {
        let mut tracker = self.tracker();
        let removed = entries::compact(&mut tracker);
        self.save_tracker(&tracker)?;
        Ok(removed)
    }

    // Analytics

    pub fn current_streak(&self, id: &HabitId, as_of: NaiveDate) -> Result<u32, LedgerError> {
        Ok(self.analytics.current_streak(&self.tracker(), id, as_of)?)
    }

    /// Longest run within the `window_days` days ending at `end`
    pub fn max_streak(
        &self,
        id: &HabitId,
        end: NaiveDate,
        window_days: Option<u32>,
    ) -> Result<u32, LedgerError> {
        let dates = crate::domain::calendar::date_range(end, self.window(window_days)?);
        Ok(self.analytics.max_streak(&self.tracker(), id, &dates)?)
    }

    /// Completion percentage over the `window_days` days ending at `end`
    pub fn completion_rate(
        &self,
        id: &HabitId,
        end: NaiveDate,
        window_days: Option<u32>,
    ) -> Result<f64, LedgerError> {
        let dates = crate::domain::calendar::date_range(end, self.window(window_days)?);
        Ok(self.analytics.completion_rate(&self.tracker(), id, &dates)?)
    }

    pub fn habit_report(
        &self,
        id: &HabitId,
        end: NaiveDate,
        window_days: Option<u32>,
    ) -> Result<HabitReport, LedgerError> {
        let window = self.window(window_days)?;
        let tracker = self.tracker();
        let habit = tracker
            .habit(id)
            .ok_or_else(|| DomainError::UnknownHabit(id.to_string()))?;
        Ok(self.analytics.habit_report(&tracker, habit, end, window))
    }

    pub fn habit_reports(
        &self,
        end: NaiveDate,
        window_days: Option<u32>,
    ) -> Result<Vec<HabitReport>, LedgerError> {
        let window = self.window(window_days)?;
        Ok(self.analytics.habit_reports(&self.tracker(), end, window))
    }

    pub fn status_grid(&self, end: NaiveDate, window_days: Option<u32>) -> Result<StatusGrid, LedgerError> {
        let window = self.window(window_days)?;
        Ok(self.analytics.status_grid(&self.tracker(), end, window))
    }

    /// Day mode for a date from the given score habits
    ///
    /// With no ids given, every score habit takes part.
    pub fn day_mode(&self, ids: &[HabitId], date: NaiveDate) -> Result<DayModeReading, LedgerError> {
        let tracker = self.tracker();
        let ids: Vec<HabitId> = if ids.is_empty() {
            tracker
                .habits
                .iter()
                .filter(|h| matches!(h.status_kind, StatusKind::Score { .. }))
                .map(|h| h.id.clone())
                .collect()
        } else {
            ids.to_vec()
        };
        Ok(self.analytics.day_mode(&tracker, &ids, date)?)
    }

    // Obligations

    pub fn list_obligations(&self) -> Vec<RecurringObligation> {
        reminders::list_obligations(&self.obligation_book()).to_vec()
    }

    pub fn add_obligation(
        &self,
        name: &str,
        amount: Option<u64>,
        anchor_date: &str,
        recurrence: RecurrenceKind,
    ) -> Result<RecurringObligation, LedgerError> {
        let mut book = self.obligation_book();
        let obligation = reminders::add_obligation(&mut book, name, amount, anchor_date, recurrence)?;
        self.save_obligations(&book)?;
        Ok(obligation)
    }

    pub fn remove_obligation(&self, id: &ObligationId) -> Result<RecurringObligation, LedgerError> {
        let mut book = self.obligation_book();
        let removed = reminders::remove_obligation(&mut book, id)?;
        self.save_obligations(&book)?;
        Ok(removed)
    }

    pub fn next_occurrence(&self, id: &ObligationId, reference: NaiveDate) -> Result<Occurrence, LedgerError> {
        Ok(reminders::next_occurrence(
            &self.obligation_book(),
            id,
            reference,
            &self.config.reminders,
        )?)
    }

    pub fn reminder_summary(&self, reference: NaiveDate) -> ReminderSummary {
        reminders::summary(&self.obligation_book(), reference, &self.config.reminders)
    }
}
