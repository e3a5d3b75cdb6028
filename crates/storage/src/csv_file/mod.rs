use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use study_core::model::StudyEntry;

use crate::repository::{EntryRepository, Storage, StorageError};

mod mapping;

/// Cranial nerve study sheet bundled with the binary.
const EMBEDDED_CSV: &str = include_str!("../../data/cranial_nerves.csv");

/// Where a [`CsvEntryStore`] reads its sheet from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    Embedded,
    Path(PathBuf),
}

impl CsvSource {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            CsvSource::Embedded => "embedded study sheet".to_owned(),
            CsvSource::Path(path) => path.display().to_string(),
        }
    }
}

/// Entry store backed by a CSV sheet with `name`, `type`, `function` and an
/// optional `role in swallowing` column.
#[derive(Debug, Clone)]
pub struct CsvEntryStore {
    source: CsvSource,
}

impl CsvEntryStore {
    #[must_use]
    pub fn new(source: CsvSource) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn embedded() -> Self {
        Self::new(CsvSource::Embedded)
    }

    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(CsvSource::Path(path.as_ref().to_path_buf()))
    }

    #[must_use]
    pub fn source(&self) -> &CsvSource {
        &self.source
    }
}

#[async_trait]
impl EntryRepository for CsvEntryStore {
    async fn load_entries(&self) -> Result<Vec<StudyEntry>, StorageError> {
        let entries = match &self.source {
            CsvSource::Embedded => mapping::parse_entries(EMBEDDED_CSV.as_bytes())?,
            CsvSource::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| StorageError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                mapping::parse_entries(bytes.as_slice())?
            }
        };
        tracing::debug!(
            source = %self.source.describe(),
            count = entries.len(),
            "loaded study entries"
        );
        Ok(entries)
    }
}

impl Storage {
    /// Build a `Storage` reading entries from a CSV sheet.
    #[must_use]
    pub fn csv(source: CsvSource) -> Self {
        let repo: Arc<dyn EntryRepository> = Arc::new(CsvEntryStore::new(source));
        Self { entries: repo }
    }
}
