pub mod auth;
pub mod backend;
pub mod drive;
pub mod error;
pub mod folders;
pub mod traits;

use std::time::Duration;

use tracing::info;

pub use backend::ObjectFileStore;
pub use drive::DriveClient;
pub use error::StorageError;
pub use folders::get_or_create;
pub use traits::{FileStore, StoredFile};

/// Produce a ready-to-use file store for the configured backend.
///
/// The Drive backend needs the cached credential at `storage.token_path`;
/// a missing or unrefreshable credential is a [`StorageError::SetupRequired`].
pub async fn authenticate(config: &zoo_core::ZooConfig) -> Result<Box<dyn FileStore>, StorageError> {
    match config.storage.backend.as_str() {
        "drive" => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?;
            let token = auth::authorize(&config.storage.token_path, &client).await?;
            info!("Storage: Google Drive backend authorized");
            Ok(Box::new(DriveClient::new(client, token)))
        }
        "local" => Ok(Box::new(ObjectFileStore::local(&config.storage.data_dir)?)),
        "s3" => Ok(Box::new(ObjectFileStore::s3(&config.aws)?)),
        other => Err(StorageError::NotConfigured(format!(
            "unknown STORAGE_BACKEND '{other}' (expected drive, local or s3)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let mut config = zoo_core::ZooConfig::default();
        config.storage.backend = "ftp".to_string();
        let err = authenticate(&config).await.err().unwrap();
        assert!(err.to_string().contains("ftp"));
    }

    #[tokio::test]
    async fn drive_without_token_requires_setup() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = zoo_core::ZooConfig::default();
        config.storage.token_path = tmp.path().join("token.json");
        let err = authenticate(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::SetupRequired(_)));
    }

    #[tokio::test]
    async fn local_backend_from_config() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = zoo_core::ZooConfig::default();
        config.storage.backend = "local".to_string();
        config.storage.data_dir = tmp.path().join("data");
        let store = authenticate(&config).await.unwrap();
        assert_eq!(store.label(), "Local filesystem");
    }
}
