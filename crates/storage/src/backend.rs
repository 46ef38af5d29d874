use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::{Path, PathPart};
use object_store::ObjectStore;
use tracing::info;
use url::Url;

use zoo_core::config::AwsConfig;

use crate::error::StorageError;
use crate::traits::{FileStore, StoredFile};

/// Marker object that makes an otherwise empty folder visible in listings.
const FOLDER_MARKER: &str = ".keep";

/// File store over `object_store`, with folders as key prefixes.
///
/// Folder and file ids are object paths (`root/Dog/dog_1.jpg`).
pub struct ObjectFileStore {
    store: Arc<dyn ObjectStore>,
    /// Base for view links (`file:///data/` or `s3://bucket/`).
    base_url: Url,
    label: &'static str,
}

impl ObjectFileStore {
    /// Local filesystem backend rooted at `data_dir` (created if missing).
    pub fn local(data_dir: &FsPath) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let canonical = std::fs::canonicalize(data_dir)?;
        let store = LocalFileSystem::new_with_prefix(&canonical)?;
        let base_url = Url::from_directory_path(&canonical).map_err(|_| {
            StorageError::NotConfigured(format!("DATA_DIR is not absolute: {}", canonical.display()))
        })?;
        info!("Storage: local backend at {}", canonical.display());
        Ok(Self {
            store: Arc::new(store),
            base_url,
            label: "Local filesystem",
        })
    }

    /// S3 (or S3-compatible) backend.
    pub fn s3(aws: &AwsConfig) -> Result<Self, StorageError> {
        let bucket = aws
            .s3_bucket
            .as_deref()
            .ok_or_else(|| StorageError::NotConfigured("S3_BUCKET not set".into()))?;

        let mut builder = AmazonS3Builder::new()
            .with_region(&aws.region)
            .with_bucket_name(bucket);

        if let Some(ref key) = aws.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(ref secret) = aws.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(ref token) = aws.session_token {
            builder = builder.with_token(token);
        }

        if let Some(ref endpoint) = aws.endpoint_url {
            // object_store requires absolute URLs
            let endpoint_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                endpoint.clone()
            } else {
                format!("https://{}", endpoint)
            };
            builder = builder
                .with_endpoint(&endpoint_url)
                .with_allow_http(endpoint_url.starts_with("http://"));
        }

        let store = builder.build()?;
        let base_url = Url::parse(&format!("s3://{}/", bucket))
            .map_err(|e| StorageError::NotConfigured(format!("invalid S3_BUCKET: {e}")))?;

        info!("Storage: S3 backend s3://{} (region: {})", bucket, aws.region);

        Ok(Self {
            store: Arc::new(store),
            base_url,
            label: "Amazon S3",
        })
    }

    fn url_for(&self, path: &Path) -> Option<String> {
        self.base_url.join(path.as_ref()).ok().map(String::from)
    }
}

#[async_trait]
impl FileStore for ObjectFileStore {
    async fn find_folders(&self, name: &str, parent_id: &str) -> Result<Vec<String>, StorageError> {
        let parent = Path::parse(parent_id)?;
        let wanted = PathPart::from(name);

        let listing = self.store.list_with_delimiter(Some(&parent)).await?;
        Ok(listing
            .common_prefixes
            .into_iter()
            .filter(|prefix| prefix.filename() == Some(wanted.as_ref()))
            .map(|prefix| prefix.to_string())
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        let folder = Path::parse(parent_id)?.child(name);
        let marker = folder.child(FOLDER_MARKER);
        self.store.put(&marker, Bytes::new().into()).await?;
        Ok(folder.to_string())
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content: Bytes,
        _mime_type: &str,
    ) -> Result<StoredFile, StorageError> {
        let path = Path::parse(parent_id)?.child(name);
        self.store.put(&path, content.into()).await?;
        Ok(StoredFile {
            view_url: self.url_for(&path),
            id: path.to_string(),
        })
    }

    fn folder_url(&self, folder_id: &str) -> Option<String> {
        let path = Path::parse(folder_id).ok()?;
        self.url_for(&path)
    }

    fn label(&self) -> &str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_backend_creates_folders_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ObjectFileStore::local(tmp.path()).unwrap();
        assert_eq!(store.label(), "Local filesystem");

        assert!(store.find_folders("Dog", "zoo").await.unwrap().is_empty());

        let folder = store.create_folder("Dog", "zoo").await.unwrap();
        assert_eq!(folder, "zoo/Dog");
        assert_eq!(store.find_folders("Dog", "zoo").await.unwrap(), vec!["zoo/Dog".to_string()]);
        assert!(store.find_folders("Cat", "zoo").await.unwrap().is_empty());

        let file = store
            .create_file("dog_7.jpg", &folder, Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(file.id, "zoo/Dog/dog_7.jpg");
        let url = file.view_url.unwrap();
        assert!(url.starts_with("file://"), "got: {url}");
        assert!(url.ends_with("zoo/Dog/dog_7.jpg"), "got: {url}");

        let on_disk = std::fs::read(tmp.path().join("zoo/Dog/dog_7.jpg")).unwrap();
        assert_eq!(on_disk, b"jpeg");
    }

    #[tokio::test]
    async fn local_folder_names_with_spaces() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ObjectFileStore::local(tmp.path()).unwrap();

        let folder = store.create_folder("Guinea pig", "zoo").await.unwrap();
        assert_eq!(store.find_folders("Guinea pig", "zoo").await.unwrap(), vec![folder]);
    }

    #[test]
    fn s3_requires_bucket() {
        let err = ObjectFileStore::s3(&AwsConfig::default()).err().unwrap();
        assert!(matches!(err, StorageError::NotConfigured(_)));
    }

    #[test]
    fn s3_view_urls() {
        let aws = AwsConfig {
            s3_bucket: Some("zoo-bucket".to_string()),
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..AwsConfig::default()
        };
        let store = ObjectFileStore::s3(&aws).unwrap();
        assert_eq!(store.folder_url("zoo/Dog").as_deref(), Some("s3://zoo-bucket/zoo/Dog"));
        assert_eq!(store.label(), "Amazon S3");
    }
}
