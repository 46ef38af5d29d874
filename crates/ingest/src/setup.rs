//! Connecting the job to its external services.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use zoo_core::{ConfigError, ZooConfig};
use zoo_metadata::{MetadataError, MetadataStore, PgMetadataStore};
use zoo_storage::{FileStore, StorageError};

use crate::search::{ImageSource, PixabayClient};

/// Fatal errors raised before any category is processed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Connected clients for one run.
pub struct Services {
    pub search: Box<dyn ImageSource>,
    pub files: Box<dyn FileStore>,
    pub metadata: Box<dyn MetadataStore>,
}

#[async_trait]
pub trait JobSetup: Send + Sync {
    async fn connect(&self, config: &ZooConfig) -> Result<Services, SetupError>;
}

/// Pixabay, the configured storage backend and PostgreSQL.
pub struct LiveSetup;

#[async_trait]
impl JobSetup for LiveSetup {
    async fn connect(&self, config: &ZooConfig) -> Result<Services, SetupError> {
        let search = PixabayClient::new(
            config.search.api_key()?.to_string(),
            config.search.base_url.clone(),
        );

        let files = zoo_storage::authenticate(config).await?;
        info!(backend = files.label(), "Storage ready");

        let metadata = PgMetadataStore::connect(&config.metadata).await?;
        info!("Metadata store ready");

        Ok(Services {
            search: Box::new(search),
            files,
            metadata: Box::new(metadata),
        })
    }
}
