//! The ordered book list and its persistence.
//!
//! Records keep insertion order. Each one carries a stable [`RecordId`]
//! assigned at creation, so deletions never depend on a row position that a
//! previous deletion may have shifted.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{error::StorageError, storage::Storage, Result, ShelfError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|err| ShelfError::msg(format!("invalid record id `{raw}`: {err}")))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Absent in lists written before ids existed; those get a fresh one.
    #[serde(default)]
    pub id: RecordId,
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(deserialize_with = "year_from_number_or_text")]
    pub year: i64,
}

fn year_from_number_or_text<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Text(String),
    }

    match RawYear::deserialize(deserializer)? {
        RawYear::Number(year) => Ok(year),
        RawYear::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("year `{text}` is not an integer"))),
    }
}

/// Raw form input, untrimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCandidate {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
}

impl BookCandidate {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year: year.into(),
        }
    }

    /// Trims every field and checks that all four are present and that the
    /// year is an integer. Any integer is accepted, including negative years.
    pub fn validate(&self) -> std::result::Result<BookRecord, ValidationError> {
        let field = |name: &'static str, value: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ValidationError::MissingField(name))
            } else {
                Ok(trimmed.to_string())
            }
        };

        let isbn = field("isbn", &self.isbn)?;
        let title = field("title", &self.title)?;
        let author = field("author", &self.author)?;
        let year_text = field("year", &self.year)?;
        let year = year_text
            .parse()
            .map_err(|_| ValidationError::InvalidYear(year_text.clone()))?;

        Ok(BookRecord {
            id: RecordId::new(),
            isbn,
            title,
            author,
            year,
        })
    }
}

/// Owns the record list and flushes it to storage after every mutation.
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: S,
    key: String,
    records: Vec<BookRecord>,
    revision: u64,
}

impl<S: Storage> RecordStore<S> {
    /// Loads the list stored under `key`. Never fails: unreadable content
    /// yields an empty list and a warning, unreadable entries are skipped.
    ///
    /// Entries stored without an id are given one and the list is written
    /// back immediately, so the ids stay the same across reloads.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded = load_entries(&storage, &key);
        let mut store = Self {
            storage,
            key,
            records: loaded.records,
            revision: 0,
        };
        if loaded.assigned_ids > 0 {
            tracing::info!(assigned = loaded.assigned_ids, "storing ids for legacy records");
            if let Err(err) = store.persist() {
                tracing::warn!(error = %err, key = %store.key, "assigned ids were not stored");
            }
        }
        store
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by id.
    pub fn get(&self, id: RecordId) -> Option<&BookRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Validates and appends a record, returning its new id. Validation
    /// failures leave the list untouched; a failed flush is logged and the
    /// record stays in memory.
    pub fn add(&mut self, candidate: &BookCandidate) -> Result<RecordId> {
        let record = candidate.validate()?;
        let id = record.id;
        tracing::debug!(%id, isbn = %record.isbn, "adding record");
        self.records.push(record);
        self.changed();
        Ok(id)
    }

    /// Removes the record with `id` and returns it. Unknown ids are logged
    /// and ignored.
    pub fn remove(&mut self, id: RecordId) -> Option<BookRecord> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            tracing::warn!(%id, "remove requested for unknown record");
            return None;
        };
        let removed = self.records.remove(index);
        self.changed();
        Some(removed)
    }

    /// Positional removal. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<BookRecord> {
        if index >= self.records.len() {
            tracing::warn!(index, len = self.records.len(), "remove index out of range");
            return None;
        }
        let removed = self.records.remove(index);
        self.changed();
        Some(removed)
    }

    /// Writes the full list. In-memory state is unchanged on failure.
    pub fn persist(&mut self) -> Result<()> {
        let serialized = serde_json::to_string(&self.records)?;
        self.storage.write(&self.key, &serialized)
    }

    fn changed(&mut self) {
        self.revision += 1;
        if let Err(err) = self.persist() {
            tracing::warn!(error = %err, key = %self.key, "changes will not survive a reload");
        }
    }
}

#[derive(Debug, Default)]
struct Loaded {
    records: Vec<BookRecord>,
    /// Entries that had no stored id.
    assigned_ids: usize,
}

/// Reads the list stored under `key`, falling back to an empty list.
/// Entries that cannot be read are skipped with a warning.
pub fn load<S: Storage>(storage: &S, key: &str) -> Vec<BookRecord> {
    load_entries(storage, key).records
}

fn load_entries<S: Storage>(storage: &S, key: &str) -> Loaded {
    let entries = match read_entries(storage, key) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, key, "could not load stored records");
            return Loaded::default();
        }
    };

    let mut loaded = Loaded::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let has_id = entry.get("id").is_some();
        match serde_json::from_value::<BookRecord>(entry) {
            Ok(record) => {
                if !has_id {
                    loaded.assigned_ids += 1;
                }
                loaded.records.push(record);
            }
            Err(err) => {
                tracing::warn!(error = %err, key, index, "skipping unreadable stored record");
            }
        }
    }
    loaded
}

fn read_entries<S: Storage>(storage: &S, key: &str) -> Result<Vec<serde_json::Value>> {
    let Some(raw) = storage.read(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|err| {
        StorageError::Malformed {
            key: key.to_string(),
            reason: err.to_string(),
        }
        .into()
    })
}
