use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use study_core::model::{EntryError, StudyEntry};
use thiserror::Error;

/// Errors surfaced by entry stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to read CSV headers: {0}")]
    Headers(String),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("row {row}: failed to read record: {message}")]
    Record { row: usize, message: String },

    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: EntryError,
    },
}

/// Source of the study entries shown by the application.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Load every entry in display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is unreachable or malformed.
    async fn load_entries(&self) -> Result<Vec<StudyEntry>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<Vec<StudyEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new(entries: Vec<StudyEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Swap the stored entries, e.g. to simulate an edited source before a reload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn replace_entries(&self, entries: Vec<StudyEntry>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = entries;
        Ok(())
    }
}

#[async_trait]
impl EntryRepository for InMemoryRepository {
    async fn load_entries(&self) -> Result<Vec<StudyEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Holds the configured entry repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub entries: Arc<dyn EntryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(entries: Vec<StudyEntry>) -> Self {
        let repo: Arc<dyn EntryRepository> = Arc::new(InMemoryRepository::new(entries));
        Self { entries: repo }
    }
}
