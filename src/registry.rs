//! Habit registry
//!
//! Adds, removes and renames habit definitions inside a loaded
//! [`TrackerDocument`]. Names are unique among active habits (exact,
//! case-sensitive match after trimming). Removing a habit also removes every
//! entry recorded for it.

use crate::domain::{DomainError, HabitDefinition, HabitId, StatusKind};
use crate::storage::TrackerDocument;

/// What a removal took out of the document
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedHabit {
    pub habit: HabitDefinition,
    pub entries_removed: usize,
}

pub fn list_habits(tracker: &TrackerDocument) -> &[HabitDefinition] {
    &tracker.habits
}

pub fn find_by_name<'a>(tracker: &'a TrackerDocument, name: &str) -> Option<&'a HabitDefinition> {
    let name = name.trim();
    tracker.habits.iter().find(|h| h.name == name)
}

/// Add a habit with a fresh id
pub fn add_habit(
    tracker: &mut TrackerDocument,
    name: &str,
    status_kind: StatusKind,
) -> Result<HabitDefinition, DomainError> {
    let habit = HabitDefinition::new(name, status_kind)?;
    ensure_name_free(tracker, &habit.name, None)?;

    tracker.habits.push(habit.clone());
    tracing::debug!("Added habit '{}' ({})", habit.name, habit.id);
    Ok(habit)
}

/// Remove a habit and cascade-delete its entries
pub fn remove_habit(
    tracker: &mut TrackerDocument,
    id: &HabitId,
) -> Result<RemovedHabit, DomainError> {
    let index = tracker
        .habits
        .iter()
        .position(|h| &h.id == id)
        .ok_or_else(|| DomainError::UnknownHabit(id.to_string()))?;
    let habit = tracker.habits.remove(index);

    let mut entries_removed = 0;
    for day in tracker.entries.values_mut() {
        if day.remove(id).is_some() {
            entries_removed += 1;
        }
    }
    tracker.entries.retain(|_, day| !day.is_empty());

    tracing::debug!(
        "Removed habit '{}' ({}) and {} entries",
        habit.name,
        habit.id,
        entries_removed
    );
    Ok(RemovedHabit {
        habit,
        entries_removed,
    })
}

/// Change a habit's display name; entries stay attached through the id
pub fn rename_habit(
    tracker: &mut TrackerDocument,
    id: &HabitId,
    new_name: &str,
) -> Result<HabitDefinition, DomainError> {
    if tracker.habit(id).is_none() {
        return Err(DomainError::UnknownHabit(id.to_string()));
    }
    let name = HabitDefinition::validate_name(new_name)?;
    ensure_name_free(tracker, &name, Some(id))?;

    let habit = tracker
        .habit_mut(id)
        .ok_or_else(|| DomainError::UnknownHabit(id.to_string()))?;
    let old_name = std::mem::replace(&mut habit.name, name);

    tracing::debug!("Renamed habit {} from '{}' to '{}'", habit.id, old_name, habit.name);
    Ok(habit.clone())
}

fn ensure_name_free(
    tracker: &TrackerDocument,
    name: &str,
    except: Option<&HabitId>,
) -> Result<(), DomainError> {
    let taken = tracker
        .habits
        .iter()
        .any(|h| h.name == name && Some(&h.id) != except);

    if taken {
        Err(DomainError::DuplicateName(name.to_string()))
    } else {
        Ok(())
    }
}
