use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

/// A file that was written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    /// Shareable link, when the backend hands one out.
    pub view_url: Option<String>,
}

/// Folder-oriented file store the job uploads into.
///
/// Folder and file identifiers are opaque strings owned by the backend.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Ids of the non-trashed folders named exactly `name` directly under `parent_id`.
    async fn find_folders(&self, name: &str, parent_id: &str) -> Result<Vec<String>, StorageError>;

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError>;

    async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content: Bytes,
        mime_type: &str,
    ) -> Result<StoredFile, StorageError>;

    /// Browser link to a folder, if the backend has one.
    fn folder_url(&self, _folder_id: &str) -> Option<String> {
        None
    }

    /// Human-readable backend name (e.g. "Google Drive").
    fn label(&self) -> &str;
}
