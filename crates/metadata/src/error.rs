use thiserror::Error;

use zoo_core::ConfigError;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The database could not be reached or did not answer the liveness probe.
    #[error("Metadata store unreachable: {0}")]
    Connectivity(String),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
