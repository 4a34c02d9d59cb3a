//! File-Backed Storage
//!
//! Each key is stored as `<dir>/<key>.json`. Values are written to a sibling
//! `.json.tmp` file and renamed into place, so a read always sees the last
//! complete write even if the process dies mid-write.

use std::path::{Path, PathBuf};

use super::traits::{KeyValueStorage, StorageError, StorageResult};

/// Directory of JSON files, one per key
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(
            key,
            path = %path.display(),
            bytes = value.len(),
            "Wrote storage file"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("accounts").unwrap(), None);
    }

    #[test]
    fn test_round_trip_creates_directory() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("store"));

        storage.set("accounts", r#"{"nextId":1}"#).unwrap();

        assert!(dir.path().join("nested/store/accounts.json").exists());
        assert_eq!(
            storage.get("accounts").unwrap().as_deref(),
            Some(r#"{"nextId":1}"#)
        );
    }

    #[test]
    fn test_overwrite() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("accounts", "first value").unwrap();
        storage.set("accounts", "2").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("accounts", r#"{"accounts":[],"nextId":1}"#).unwrap();
        storage.set("accounts", r#"{"accounts":[],"nextId":2}"#).unwrap();

        assert!(!dir.path().join("accounts.json.tmp").exists());
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["accounts.json".to_string()]);
        assert_eq!(
            storage.get("accounts").unwrap().as_deref(),
            Some(r#"{"accounts":[],"nextId":2}"#)
        );
    }

    #[test]
    fn test_stale_temp_file_is_replaced() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("accounts.json.tmp"), "half a wri").unwrap();
        std::fs::write(dir.path().join("accounts.json"), "old").unwrap();

        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("old"));

        storage.set("accounts", "new").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("new"));
        assert!(!dir.path().join("accounts.json.tmp").exists());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let storage = FileStorage::new("unused");
        for key in ["", ".", "../escape", "a/b", "a\\b"] {
            assert!(
                matches!(storage.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
