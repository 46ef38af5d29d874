use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use zoo_core::ImageRecord;

use crate::error::MetadataError;
use crate::store::{InsertOutcome, MetadataStore};

/// In-process store with the same uniqueness rule as the database.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    records: Mutex<BTreeMap<i64, ImageRecord>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ImageRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.external_id, r)).collect()),
        }
    }

    /// Snapshot ordered by external id.
    pub fn records(&self) -> Vec<ImageRecord> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<i64, ImageRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn exists_by_external_id(&self, external_id: i64) -> Result<bool, MetadataError> {
        Ok(self.lock().contains_key(&external_id))
    }

    async fn insert(&self, record: &ImageRecord) -> Result<InsertOutcome, MetadataError> {
        let mut records = self.lock();
        if records.contains_key(&record.external_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        records.insert(record.external_id, record.clone());
        Ok(InsertOutcome::Inserted)
    }
}
