use async_trait::async_trait;

use zoo_core::ImageRecord;

use crate::error::MetadataError;

/// Result of recording an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The unique index already holds this external id.
    AlreadyExists,
}

/// Existence checks and inserts keyed by the external image id.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn exists_by_external_id(&self, external_id: i64) -> Result<bool, MetadataError>;

    async fn insert(&self, record: &ImageRecord) -> Result<InsertOutcome, MetadataError>;
}
