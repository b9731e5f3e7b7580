//! Durable key-value storage backing the record list.
//!
//! Values are whole serialized documents; every write replaces the previous
//! value for the key.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{error::StorageError, Result};

pub trait Storage {
    /// Returns the stored value, or `None` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage. An optional byte quota makes oversized writes fail
/// the way a full browser store does.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Stores a raw value directly, bypassing the quota.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    quota,
                }
                .into());
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read {
                key: key.to_string(),
                reason: err.to_string(),
            }
            .into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.root)?;
            let path = self.path_for(key);
            let staging = path.with_extension("json.tmp");
            std::fs::write(&staging, value)?;
            std::fs::rename(&staging, &path)
        };

        write().map_err(|err| {
            StorageError::Write {
                key: key.to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShelfError;

    #[test]
    fn memory_quota_rejects_large_writes() {
        let mut storage = MemoryStorage::with_quota(4);
        storage.write("k", "1234").unwrap();

        let err = storage.write("k", "12345").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Storage(StorageError::QuotaExceeded { needed: 5, .. })
        ));
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn file_storage_reports_missing_keys_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("absent").unwrap().is_none());
    }

    #[test]
    fn file_storage_overwrites_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage.write("books", "[1]").unwrap();
        storage.write("books", "[]").unwrap();

        assert_eq!(storage.read("books").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested/books.json").exists());
    }
}
