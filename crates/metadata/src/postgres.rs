//! PostgreSQL-backed metadata store for the `images_metadata` table.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};

use zoo_core::config::MetadataConfig;
use zoo_core::ImageRecord;

use crate::error::MetadataError;
use crate::store::{InsertOutcome, MetadataStore};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    /// Connect, probe liveness with `SELECT 1`, and apply migrations
    /// (table plus unique index on `external_id`; idempotent).
    pub async fn connect(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let url = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(url)
            .map_err(|e| MetadataError::Connectivity(e.to_string()))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| MetadataError::Connectivity(e.to_string()))?;
        info!("Metadata store connected");

        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("Metadata migrations applied");

        Ok(Self { pool })
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn exists_by_external_id(&self, external_id: i64) -> Result<bool, MetadataError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM images_metadata WHERE external_id = $1)",
        )
        .bind(external_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, record: &ImageRecord) -> Result<InsertOutcome, MetadataError> {
        let result = sqlx::query(
            "INSERT INTO images_metadata
                (external_id, category, tags, author, storage_url, date_added, source_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.external_id)
        .bind(&record.category)
        .bind(&record.tags)
        .bind(&record.author)
        .bind(&record.storage_url)
        .bind(record.date_added)
        .bind(&record.source_url)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => {
                error!(external_id = record.external_id, "metadata insert failed: {}", e);
                Err(MetadataError::Database(e))
            }
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
