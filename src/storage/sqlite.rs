//! SQLite implementation of the document store
//!
//! Each collection is one row in the `documents` table holding the JSON text
//! of the whole document. The schema is created and migrated on open.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::{
    migrations, parse_document, validate_collection, Document, DocumentStore, StorageError,
};

/// SQLite-based document store
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite document store initialized at: {:?}", db_path);
        Ok(Self { conn })
    }

    /// A throwaway database, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Number of collections with a stored document
    pub fn collection_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn read(&self, collection: &str) -> Result<Option<Document>, StorageError> {
        validate_collection(collection)?;

        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(text) => parse_document(collection, &text).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, collection: &str, document: &Document) -> Result<(), StorageError> {
        validate_collection(collection)?;
        let body = serde_json::to_string(document)?;

        self.conn.execute(
            "INSERT INTO documents (collection, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            params![collection, body, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}
