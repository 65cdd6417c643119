//! Reminder computation over the obligation book
//!
//! Obligations are stored with their anchor date only. Next occurrences,
//! days-until and urgency are derived on every call against a reference date.

use chrono::NaiveDate;

use crate::domain::{
    DomainError, ObligationId, Occurrence, RecurrenceKind, RecurringObligation, ReminderSummary,
    ReminderWindows,
};
use crate::storage::ObligationBook;

pub fn list_obligations(book: &ObligationBook) -> &[RecurringObligation] {
    &book.obligations
}

/// Add an obligation; the anchor date is validated here
pub fn add_obligation(
    book: &mut ObligationBook,
    name: &str,
    amount: Option<u64>,
    anchor_date: &str,
    recurrence: RecurrenceKind,
) -> Result<RecurringObligation, DomainError> {
    let obligation = RecurringObligation::new(name, amount, anchor_date, recurrence)?;
    book.obligations.push(obligation.clone());

    tracing::debug!(
        "Added obligation '{}' ({}) anchored {} repeating {}",
        obligation.name,
        obligation.id,
        obligation.anchor_date,
        obligation.recurrence.as_str()
    );
    Ok(obligation)
}

pub fn remove_obligation(
    book: &mut ObligationBook,
    id: &ObligationId,
) -> Result<RecurringObligation, DomainError> {
    let index = book
        .obligations
        .iter()
        .position(|o| &o.id == id)
        .ok_or_else(|| DomainError::UnknownObligation(id.to_string()))?;

    let removed = book.obligations.remove(index);
    tracing::debug!("Removed obligation '{}' ({})", removed.name, removed.id);
    Ok(removed)
}

/// Next occurrence of one obligation as seen from `reference`
pub fn next_occurrence(
    book: &ObligationBook,
    id: &ObligationId,
    reference: NaiveDate,
    windows: &ReminderWindows,
) -> Result<Occurrence, DomainError> {
    book.obligations
        .iter()
        .find(|o| &o.id == id)
        .map(|o| o.occurrence(reference, windows))
        .ok_or_else(|| DomainError::UnknownObligation(id.to_string()))
}

/// Every obligation's next occurrence, soonest first, with horizon totals
pub fn summary(
    book: &ObligationBook,
    reference: NaiveDate,
    windows: &ReminderWindows,
) -> ReminderSummary {
    ReminderSummary::build(&book.obligations, reference, windows)
}
