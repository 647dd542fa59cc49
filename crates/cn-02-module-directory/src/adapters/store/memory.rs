use crate::domain::StoreError;
use crate::ports::ModuleStore;
use parking_lot::Mutex;
use shared_types::ModuleRecord;

/// In-memory module cache. Used when no cache path is configured, and in
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryModuleStore {
    records: Mutex<Vec<ModuleRecord>>,
}

impl InMemoryModuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `records`, as if left over from a previous run.
    pub fn with_records(records: Vec<ModuleRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

pub(super) fn upsert(records: &mut Vec<ModuleRecord>, record: &ModuleRecord) {
    match records.iter_mut().find(|r| r.package == record.package) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

impl ModuleStore for InMemoryModuleStore {
    fn delete_all(&self) -> Result<(), StoreError> {
        self.records.lock().clear();
        Ok(())
    }

    fn insert_or_replace(&self, record: &ModuleRecord) -> Result<(), StoreError> {
        upsert(&mut self.records.lock(), record);
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<ModuleRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn replace_all(&self, records: &[ModuleRecord]) -> Result<(), StoreError> {
        let mut replacement = Vec::with_capacity(records.len());
        for record in records {
            upsert(&mut replacement, record);
        }
        *self.records.lock() = replacement;
        Ok(())
    }
}
