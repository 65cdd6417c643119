//! In-memory document store
//!
//! Keeps raw JSON text per collection, exactly as a file would, so corrupt
//! content can be seeded and the load fallback exercised without touching
//! disk.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::storage::{parse_document, validate_collection, Document, DocumentStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with raw text, valid JSON or not
    pub fn insert_raw(&self, collection: &str, text: &str) {
        self.documents
            .borrow_mut()
            .insert(collection.to_string(), text.to_string());
    }

    /// Raw text currently stored for a collection
    pub fn raw(&self, collection: &str) -> Option<String> {
        self.documents.borrow().get(collection).cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, collection: &str) -> Result<Option<Document>, StorageError> {
        validate_collection(collection)?;
        match self.documents.borrow().get(collection) {
            Some(text) => parse_document(collection, text).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, collection: &str, document: &Document) -> Result<(), StorageError> {
        validate_collection(collection)?;
        let text = serde_json::to_string(document)?;
        self.documents
            .borrow_mut()
            .insert(collection.to_string(), text);
        Ok(())
    }
}
