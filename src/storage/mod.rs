//! Storage layer: the record store adapter
//!
//! Durable state is a handful of JSON documents, one per logical
//! collection. A store only loads and saves whole documents; it never looks
//! inside them. Interpreting the contents is the job of [`schema`].

pub mod json_file;
pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

// Re-export the main storage types
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use schema::{ObligationBook, TrackerDocument, CURRENT_SCHEMA_VERSION};
pub use sqlite::SqliteDocumentStore;

use thiserror::Error;

/// An opaque JSON object stored under one collection id
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Collection holding habit definitions and daily entries
pub const TRACKER_COLLECTION: &str = "tracker";
/// Collection holding recurring obligations
pub const OBLIGATIONS_COLLECTION: &str = "obligations";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read collection '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Collection '{collection}' is corrupt: {reason}")]
    Corrupt { collection: String, reason: String },

    #[error("Failed to write collection '{collection}': {source}")]
    Write {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid collection id '{0}': use lowercase letters, digits, '_' or '-'")]
    InvalidCollection(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// A load/save store of whole JSON documents keyed by collection id
///
/// Implementors provide `read` and `write`. Callers normally use `load` and
/// `save`, which add the availability policy: a missing or unreadable
/// document loads as an empty one so the user is never blocked. The fallback
/// is always logged. Write errors are never swallowed.
pub trait DocumentStore {
    /// Read a document; `Ok(None)` means the collection has never been saved
    fn read(&self, collection: &str) -> Result<Option<Document>, StorageError>;

    /// Replace a document as a whole
    fn write(&self, collection: &str, document: &Document) -> Result<(), StorageError>;

    /// Load a document, falling back to an empty one when it is missing or unreadable
    fn load(&self, collection: &str) -> Document {
        match self.read(collection) {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!("Collection '{}' not found, starting empty", collection);
                Document::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load collection '{}', starting from an empty document: {}",
                    collection,
                    e
                );
                Document::new()
            }
        }
    }

    /// Save a document, replacing whatever was stored before
    fn save(&self, collection: &str, document: &Document) -> Result<(), StorageError> {
        validate_collection(collection)?;
        self.write(collection, document)?;
        tracing::debug!("Saved collection '{}' ({} keys)", collection, document.len());
        Ok(())
    }
}

/// Check that a collection id is safe to use as a file stem or key
pub fn validate_collection(collection: &str) -> Result<(), StorageError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidCollection(collection.to_string()))
    }
}

/// Parse stored text into a document; anything but a JSON object is corrupt
pub(crate) fn parse_document(collection: &str, text: &str) -> Result<Document, StorageError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| StorageError::Corrupt {
            collection: collection.to_string(),
            reason: e.to_string(),
        })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StorageError::Corrupt {
            collection: collection.to_string(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
