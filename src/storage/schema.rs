//! Versioned document schemas
//!
//! Stored documents are loosely shaped: older files use bare status strings,
//! snake_case keys, or miss fields entirely. Every default is filled here, in
//! one normalization pass at load time, so the rest of the crate works with
//! fully typed values and never has to guess.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::calendar;
use crate::domain::{
    EntryRecord, EntryStatus, HabitDefinition, HabitId, ObligationId, RecurrenceKind,
    RecurringObligation, StatusKind, SCORE_MAX,
};
use crate::storage::{Document, StorageError};

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Name given to habits and obligations stored without one
pub const UNTITLED: &str = "untitled";

/// Entries keyed by date, then by habit id
pub type EntryTable = BTreeMap<NaiveDate, BTreeMap<HabitId, EntryRecord>>;

/// The `tracker` collection: habit definitions and their daily entries
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerDocument {
    /// Version the document was loaded with; 0 for documents that predate versioning
    pub version: u32,
    pub habits: Vec<HabitDefinition>,
    pub entries: EntryTable,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackerOut<'a> {
    version: u32,
    habits: &'a [HabitDefinition],
    entries: &'a EntryTable,
}

impl Default for TrackerDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerDocument {
    pub fn new() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            habits: Vec::new(),
            entries: BTreeMap::new(),
        }
    }

    /// Normalize a raw document, dropping whatever cannot be repaired
    pub fn from_document(document: &Document) -> Self {
        let version = read_version(document, "tracker");
        let now = Utc::now();

        let mut habits: Vec<HabitDefinition> = Vec::new();
        match document.get("habits") {
            Some(Value::Array(items)) => {
                for (position, item) in items.iter().enumerate() {
                    let Some(habit) = normalize_habit(item, position, now) else {
                        continue;
                    };
                    if habits.iter().any(|h| h.id == habit.id) {
                        tracing::warn!("Dropping habit with duplicate id '{}'", habit.id);
                        continue;
                    }
                    habits.push(habit);
                }
            }
            Some(other) => {
                tracing::warn!("Ignoring 'habits': expected an array, found {}", other);
            }
            None => {}
        }

        // Older documents call the entry table "logs"
        let raw_entries = document.get("entries").or_else(|| document.get("logs"));
        let mut entries: EntryTable = BTreeMap::new();
        match raw_entries {
            Some(Value::Object(days)) => {
                for (date_key, bucket) in days {
                    let Ok(date) = calendar::parse_date(date_key) else {
                        tracing::warn!("Dropping entries under invalid date key '{}'", date_key);
                        continue;
                    };
                    let Value::Object(bucket) = bucket else {
                        tracing::warn!("Dropping entries for {}: expected an object", date_key);
                        continue;
                    };

                    let mut day: BTreeMap<HabitId, EntryRecord> = BTreeMap::new();
                    for (habit_key, value) in bucket {
                        let Ok(habit_id) = HabitId::parse(habit_key) else {
                            tracing::warn!("Dropping entry with empty habit id on {}", date_key);
                            continue;
                        };
                        match normalize_entry(value) {
                            Some(record) => {
                                day.insert(habit_id, record);
                            }
                            None => {
                                tracing::warn!(
                                    "Dropping entry for habit '{}' on {}: unreadable status {}",
                                    habit_key,
                                    date_key,
                                    value
                                );
                            }
                        }
                    }

                    if !day.is_empty() {
                        entries.entry(date).or_default().extend(day);
                    }
                }
            }
            Some(other) => {
                tracing::warn!("Ignoring 'entries': expected an object, found {}", other);
            }
            None => {}
        }

        Self {
            version,
            habits,
            entries,
        }
    }

    /// Render the stored shape, stamped with the current schema version
    pub fn to_document(&self) -> Result<Document, StorageError> {
        let out = TrackerOut {
            version: self.version.max(CURRENT_SCHEMA_VERSION),
            habits: &self.habits,
            entries: &self.entries,
        };
        into_document(serde_json::to_value(out)?)
    }

    pub fn habit(&self, id: &HabitId) -> Option<&HabitDefinition> {
        self.habits.iter().find(|h| &h.id == id)
    }

    pub fn habit_mut(&mut self, id: &HabitId) -> Option<&mut HabitDefinition> {
        self.habits.iter_mut().find(|h| &h.id == id)
    }

    pub fn entry(&self, id: &HabitId, date: NaiveDate) -> Option<&EntryRecord> {
        self.entries.get(&date).and_then(|day| day.get(id))
    }

    /// Status recorded for a habit on a date, if any
    pub fn status_on(&self, id: &HabitId, date: NaiveDate) -> Option<EntryStatus> {
        self.entry(id, date).map(|record| record.status)
    }

    /// Total number of stored entries across all dates
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}

/// The `obligations` collection
#[derive(Debug, Clone, PartialEq)]
pub struct ObligationBook {
    pub version: u32,
    pub obligations: Vec<RecurringObligation>,
}

#[derive(Serialize)]
struct ObligationsOut<'a> {
    version: u32,
    obligations: &'a [RecurringObligation],
}

impl Default for ObligationBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ObligationBook {
    pub fn new() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            obligations: Vec::new(),
        }
    }

    pub fn from_document(document: &Document) -> Self {
        let version = read_version(document, "obligations");
        let now = Utc::now();

        let mut obligations: Vec<RecurringObligation> = Vec::new();
        match document.get("obligations") {
            Some(Value::Array(items)) => {
                for (position, item) in items.iter().enumerate() {
                    let Some(obligation) = normalize_obligation(item, position, now) else {
                        continue;
                    };
                    if obligations.iter().any(|o| o.id == obligation.id) {
                        tracing::warn!("Dropping obligation with duplicate id '{}'", obligation.id);
                        continue;
                    }
                    obligations.push(obligation);
                }
            }
            Some(other) => {
                tracing::warn!("Ignoring 'obligations': expected an array, found {}", other);
            }
            None => {}
        }

        Self {
            version,
            obligations,
        }
    }

    pub fn to_document(&self) -> Result<Document, StorageError> {
        let out = ObligationsOut {
            version: self.version.max(CURRENT_SCHEMA_VERSION),
            obligations: &self.obligations,
        };
        into_document(serde_json::to_value(out)?)
    }
}

fn into_document(value: Value) -> Result<Document, StorageError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Corrupt {
            collection: "(serialized)".to_string(),
            reason: format!("expected an object, produced {}", other),
        }),
    }
}

fn read_version(document: &Document, collection: &str) -> u32 {
    let version = document
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);

    if version > CURRENT_SCHEMA_VERSION {
        tracing::warn!(
            "Collection '{}' has schema version {}, newer than supported {}; loading what is readable",
            collection,
            version,
            CURRENT_SCHEMA_VERSION
        );
    } else if version < CURRENT_SCHEMA_VERSION && !document.is_empty() {
        tracing::debug!(
            "Collection '{}' is at schema version {}, upgrading on next save",
            collection,
            version
        );
    }

    version
}

/// First of `keys` present in the object
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn name_or_untitled(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC)
fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = value?.as_str()?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Id seed for records stored without one: the same document always loads
/// with the same ids, until the first save writes them out
fn position_seed(position: usize, name: &str) -> String {
    format!("{}:{}", position, name)
}

fn normalize_habit(value: &Value, position: usize, now: DateTime<Utc>) -> Option<HabitDefinition> {
    let obj = match value {
        Value::Object(obj) => obj,
        // A bare string is a habit that only ever had a name
        Value::String(_) => {
            let name = name_or_untitled(Some(value));
            return Some(HabitDefinition::from_existing(
                HabitId::derived(&position_seed(position, &name)),
                name,
                StatusKind::Marks,
                now,
            ));
        }
        other => {
            tracing::warn!("Dropping habit record: expected an object, found {}", other);
            return None;
        }
    };

    let name = name_or_untitled(obj.get("name"));
    let id = id_text(obj.get("id"))
        .and_then(|id| HabitId::parse(&id).ok())
        .unwrap_or_else(|| {
            tracing::debug!("Habit '{}' stored without an id, deriving one", name);
            HabitId::derived(&position_seed(position, &name))
        });

    let status_kind = match field(obj, &["statusKind", "status_kind"]) {
        None => StatusKind::Marks,
        Some(raw) => match serde_json::from_value::<StatusKind>(raw.clone()) {
            Ok(StatusKind::Score { done_at }) if done_at > SCORE_MAX => {
                tracing::warn!("Habit '{}' had score threshold {}, capping it", id, done_at);
                StatusKind::Score { done_at: SCORE_MAX }
            }
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!("Habit '{}' has an unreadable status kind ({}), using marks", id, e);
                StatusKind::Marks
            }
        },
    };

    let created_at = parse_timestamp(field(obj, &["createdAt", "created_at"])).unwrap_or(now);

    Some(HabitDefinition::from_existing(id, name, status_kind, created_at))
}

fn normalize_entry(value: &Value) -> Option<EntryRecord> {
    let (status_value, note, saved_at) = match value {
        Value::Object(obj) => (
            obj.get("status")?,
            obj.get("note")
                .and_then(Value::as_str)
                .map(|n| n.trim().to_string())
                .unwrap_or_default(),
            parse_timestamp(field(obj, &["savedAt", "saved_at"])),
        ),
        // Legacy rows store only the status
        bare => (bare, String::new(), None),
    };

    let status = EntryStatus::from_value(status_value).ok()?;
    if status.score().is_some_and(|score| score > SCORE_MAX) {
        return None;
    }

    Some(EntryRecord {
        status,
        note,
        saved_at,
    })
}

fn normalize_obligation(
    value: &Value,
    position: usize,
    now: DateTime<Utc>,
) -> Option<RecurringObligation> {
    let Value::Object(obj) = value else {
        tracing::warn!("Dropping obligation record: expected an object, found {}", value);
        return None;
    };

    let name = name_or_untitled(obj.get("name"));

    let anchor_date = match field(obj, &["anchorDate", "anchor_date", "date"])
        .and_then(Value::as_str)
        .map(calendar::parse_date)
    {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            tracing::warn!("Dropping obligation '{}': {}", name, e);
            return None;
        }
        None => {
            tracing::warn!("Dropping obligation '{}': no anchor date", name);
            return None;
        }
    };

    let recurrence = match field(obj, &["recurrence", "kind"]) {
        None | Some(Value::Null) => RecurrenceKind::None,
        Some(Value::String(s)) => match s.parse::<RecurrenceKind>() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!("Dropping obligation '{}': {}", name, e);
                return None;
            }
        },
        Some(other) => {
            tracing::warn!("Dropping obligation '{}': recurrence {} is not a string", name, other);
            return None;
        }
    };

    let amount = match obj.get("amount") {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u64)
        }),
        _ => None,
    };

    let id = id_text(obj.get("id"))
        .and_then(|id| ObligationId::parse(&id).ok())
        .unwrap_or_else(|| ObligationId::derived(&position_seed(position, &name)));
    let created_at = parse_timestamp(field(obj, &["createdAt", "created_at"])).unwrap_or(now);

    Some(RecurringObligation {
        id,
        name,
        amount,
        anchor_date,
        recurrence,
        created_at,
    })
}
