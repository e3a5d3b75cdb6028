use std::collections::HashMap;
use std::io::Read;

use study_core::model::{NerveType, StudyEntry};

use crate::repository::StorageError;

const NAME: &str = "name";
const TYPE: &str = "type";
const FUNCTION: &str = "function";
const ROLE: &str = "roleinswallowing";

/// Canonical column key: BOM stripped, lowercase, no spaces.
pub(crate) fn normalize_header(header: &str) -> String {
    let trimmed = header.trim().trim_start_matches('\u{feff}');
    let key = trimmed.to_lowercase().replace(' ', "");
    match key.as_str() {
        // The source sheet has shipped with this misspelling.
        "fuction" => FUNCTION.to_owned(),
        "role_in_swallowing" => ROLE.to_owned(),
        _ => key,
    }
}

struct Columns {
    name: usize,
    nerve_type: usize,
    function: usize,
    role: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, StorageError> {
        let mut by_key: HashMap<String, usize> = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            if !key.is_empty() {
                by_key.insert(key, index);
            }
        }

        let required = |key: &'static str| {
            by_key
                .get(key)
                .copied()
                .ok_or(StorageError::MissingColumn(key))
        };

        Ok(Self {
            name: required(NAME)?,
            nerve_type: required(TYPE)?,
            function: required(FUNCTION)?,
            role: by_key.get(ROLE).copied(),
        })
    }
}

/// Parse CSV text with a header row into entries. Data rows are numbered from 1,
/// and that number becomes the entry's `order`.
pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<StudyEntry>, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| StorageError::Headers(e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut entries = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let row = offset + 1;
        let record = record.map_err(|e| StorageError::Record {
            row,
            message: e.to_string(),
        })?;
        entries.push(map_record(&record, &columns, row)?);
    }
    Ok(entries)
}

fn map_record(
    record: &csv::StringRecord,
    columns: &Columns,
    row: usize,
) -> Result<StudyEntry, StorageError> {
    let field = |index: usize| record.get(index).unwrap_or_default();
    let invalid = |source| StorageError::InvalidRow { row, source };

    let nerve_type: NerveType = field(columns.nerve_type).parse().map_err(invalid)?;
    let role = columns.role.map(field).unwrap_or_default();

    StudyEntry::new(
        field(columns.name),
        nerve_type,
        field(columns.function),
        role,
        row,
    )
    .map_err(invalid)
}
