//! Google Drive v3 backend over plain REST calls.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::StorageError;
use crate::traits::{FileStore, StoredFile};

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_API: &str = "https://www.googleapis.com/upload/drive/v3";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const MULTIPART_BOUNDARY: &str = "daily_zoo_part_boundary_5c1f0e";

/// Authenticated Drive handle; holds a ready access token.
pub struct DriveClient {
    client: Client,
    access_token: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRef {
    id: String,
    web_view_link: Option<String>,
}

impl DriveClient {
    pub fn new(client: Client, access_token: String) -> Self {
        Self { client, access_token }
    }

    async fn check(response: Response) -> Result<Response, StorageError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Api { status, body })
    }
}

/// Escape a value for use inside a single-quoted Drive query literal.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Query matching non-trashed folders named `name` directly under `parent_id`.
pub fn folder_query(name: &str, parent_id: &str) -> String {
    format!(
        "name='{}' and '{}' in parents and mimeType='{}' and trashed=false",
        escape_query_value(name),
        escape_query_value(parent_id),
        FOLDER_MIME
    )
}

/// Body of a `multipart/related` upload: JSON metadata part then the media part.
pub fn multipart_related_body(metadata: &serde_json::Value, mime_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

#[async_trait]
impl FileStore for DriveClient {
    async fn find_folders(&self, name: &str, parent_id: &str) -> Result<Vec<String>, StorageError> {
        let query = folder_query(name, parent_id);
        let response = self
            .client
            .get(format!("{DRIVE_API}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("fields", "files(id)"), ("spaces", "drive")])
            .send()
            .await?;

        let list: FileList = Self::check(response).await?.json().await?;
        debug!(name, parent_id, matches = list.files.len(), "Drive folder lookup");
        Ok(list.files.into_iter().map(|f| f.id).collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id],
            "mimeType": FOLDER_MIME,
        });

        let response = self
            .client
            .post(format!("{DRIVE_API}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await?;

        let created: FileRef = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content: Bytes,
        mime_type: &str,
    ) -> Result<StoredFile, StorageError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id],
        });
        let body = multipart_related_body(&metadata, mime_type, &content);

        let response = self
            .client
            .post(format!("{DRIVE_UPLOAD_API}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "multipart"), ("fields", "id,webViewLink")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;

        let created: FileRef = Self::check(response).await?.json().await?;
        Ok(StoredFile {
            id: created.id,
            view_url: created.web_view_link,
        })
    }

    fn folder_url(&self, folder_id: &str) -> Option<String> {
        Some(format!("https://drive.google.com/drive/u/0/folders/{folder_id}"))
    }

    fn label(&self) -> &str {
        "Google Drive"
    }
}
