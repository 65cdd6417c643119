//! JSON-file document store
//!
//! Each collection lives in `<dir>/<collection>.json`, pretty-printed so it
//! stays readable and hand-editable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{parse_document, validate_collection, Document, DocumentStore, StorageError};

/// Stores one pretty-printed JSON file per collection in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
            collection: dir.display().to_string(),
            source,
        })?;

        tracing::info!("JSON document store at: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a collection
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self, collection: &str) -> Result<Option<Document>, StorageError> {
        validate_collection(collection)?;
        let path = self.path_for(collection);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    collection: collection.to_string(),
                    source,
                })
            }
        };

        parse_document(collection, &text).map(Some)
    }

    /// Write to a sibling temp file, then rename it over the original
    ///
    /// A crash mid-write leaves the previous document intact.
    fn write(&self, collection: &str, document: &Document) -> Result<(), StorageError> {
        validate_collection(collection)?;
        let path = self.path_for(collection);
        let tmp_path = path.with_extension(format!("json.tmp.{}", std::process::id()));

        let text = serde_json::to_string_pretty(document)?;
        let to_write_error = |source: std::io::Error| StorageError::Write {
            collection: collection.to_string(),
            source,
        };

        std::fs::write(&tmp_path, text.as_bytes()).map_err(to_write_error)?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(to_write_error(e));
        }

        Ok(())
    }
}
