use super::memory::upsert;
use crate::domain::StoreError;
use crate::ports::ModuleStore;
use parking_lot::Mutex;
use shared_types::ModuleRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Module cache persisted as a JSON array.
///
/// Every write rewrites the whole file through a temp file and a rename, so
/// a crash leaves either the old roster or the new one. `replace_all` is a
/// single write.
#[derive(Debug)]
pub struct JsonFileModuleStore {
    path: PathBuf,
    records: Mutex<Vec<ModuleRecord>>,
}

impl JsonFileModuleStore {
    /// Open the cache at `path`. A missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file exists but cannot be read,
    /// [`StoreError::Corrupt`] if it is not a record array.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No module cache yet");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = records.len(), "Module cache loaded");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[ModuleRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl ModuleStore for JsonFileModuleStore {
    fn delete_all(&self) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        self.persist(&[])?;
        records.clear();
        Ok(())
    }

    fn insert_or_replace(&self, record: &ModuleRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        upsert(&mut next, record);
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<ModuleRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn replace_all(&self, replacement: &[ModuleRecord]) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        let mut next = Vec::with_capacity(replacement.len());
        for record in replacement {
            upsert(&mut next, record);
        }
        self.persist(&next)?;
        *records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<ModuleRecord> {
        vec![
            ModuleRecord::new("com.example.hub", "Hub", "3").into_mother(),
            ModuleRecord::new("com.example.a", "A", "1").with_entry_point("main"),
            ModuleRecord::new("com.example.b", "B", "2").with_image_url("https://x/b.png"),
        ]
    }

    #[test]
    fn test_replace_all_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache").join("modules.json");

        let store = JsonFileModuleStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(store.select_all().unwrap().is_empty());
        store.replace_all(&sample()).unwrap();
        drop(store);

        let reopened = JsonFileModuleStore::open(&path).unwrap();
        assert_eq!(reopened.select_all().unwrap(), sample());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_delete_all_persists_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        let store = JsonFileModuleStore::open(&path).unwrap();
        store.replace_all(&sample()).unwrap();

        store.delete_all().unwrap();

        let reopened = JsonFileModuleStore::open(&path).unwrap();
        assert!(reopened.select_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        std::fs::write(&path, b"{ not an array").unwrap();

        assert!(matches!(
            JsonFileModuleStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }
}
