//! In-process fakes for the job's external services.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use zoo_core::{Category, ImageRecord, ZooConfig};
use zoo_ingest::{ImageSource, IngestJob, JobSetup, SearchError, SearchHit, Services, SetupError};
use zoo_metadata::{InsertOutcome, MemoryMetadataStore, MetadataError, MetadataStore};
use zoo_notify::{Notification, Notifier, NotifyError, StatusMailer, TemplateRenderer};
use zoo_storage::{FileStore, StorageError, StoredFile};

pub const ROOT: &str = "root-folder";

pub fn hit(id: i64) -> SearchHit {
    SearchHit {
        id,
        image_url: format!("https://cdn.example.com/{id}_640.jpg"),
        tags: "animal, zoo".to_string(),
        user: format!("author{id}"),
        page_url: format!("https://pixabay.com/photos/{id}/"),
    }
}

pub fn record(id: i64, category: &str) -> ImageRecord {
    ImageRecord {
        external_id: id,
        category: category.to_string(),
        tags: String::new(),
        author: String::new(),
        storage_url: None,
        date_added: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        source_url: String::new(),
    }
}

pub fn config(categories: &[&str]) -> ZooConfig {
    let mut config = ZooConfig::default();
    config.search.api_key = Some("test-key".to_string());
    config.storage.root_folder_id = Some(ROOT.to_string());
    config.job.upload_delay = std::time::Duration::ZERO;
    config.job.categories = categories.iter().copied().map(Category::new).collect();
    config
}

// ── Search ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeSearch {
    results: Arc<HashMap<String, Vec<SearchHit>>>,
    failing: Arc<HashSet<String>>,
    failing_downloads: Arc<HashSet<String>>,
    pub searches: Arc<Mutex<Vec<(String, u32, u32)>>>,
    pub downloads: Arc<Mutex<Vec<String>>>,
}

impl FakeSearch {
    pub fn new(results: impl IntoIterator<Item = (&'static str, Vec<SearchHit>)>) -> Self {
        Self {
            results: Arc::new(results.into_iter().map(|(q, hits)| (q.to_string(), hits)).collect()),
            ..Self::default()
        }
    }

    pub fn failing_for(mut self, query: &str) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(query.to_string());
        self.failing = Arc::new(failing);
        self
    }

    /// Downloading the image of hit `id` fails.
    pub fn failing_download_of(mut self, id: i64) -> Self {
        let mut failing = (*self.failing_downloads).clone();
        failing.insert(hit(id).image_url);
        self.failing_downloads = Arc::new(failing);
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageSource for FakeSearch {
    async fn search(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<SearchHit>, SearchError> {
        self.searches.lock().unwrap().push((query.to_string(), page, per_page));
        if self.failing.contains(query) {
            return Err(SearchError::Api {
                status: 503,
                body: "connection reset by peer".to_string(),
            });
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    async fn download(&self, url: &str) -> Result<Bytes, SearchError> {
        self.downloads.lock().unwrap().push(url.to_string());
        if self.failing_downloads.contains(url) {
            return Err(SearchError::Api {
                status: 404,
                body: "image no longer available".to_string(),
            });
        }
        Ok(Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"))
    }
}

// ── Files ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub name: String,
    pub folder: String,
    pub mime: String,
    pub size: usize,
}

#[derive(Default)]
struct FilesState {
    /// (id, name, parent)
    folders: Vec<(String, String, String)>,
    uploads: Vec<Upload>,
}

#[derive(Clone, Default)]
pub struct RecordingFiles {
    state: Arc<Mutex<FilesState>>,
    reject_uploads_in: Arc<Option<String>>,
}

impl RecordingFiles {
    /// Uploads into the folder named `folder_name` fail.
    pub fn rejecting_uploads_in(folder_name: &str) -> Self {
        Self {
            reject_uploads_in: Arc::new(Some(folder_name.to_string())),
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn folder_names(&self) -> Vec<String> {
        self.state.lock().unwrap().folders.iter().map(|(_, name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl FileStore for RecordingFiles {
    async fn find_folders(&self, name: &str, parent_id: &str) -> Result<Vec<String>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .folders
            .iter()
            .filter(|(_, n, p)| n == name && p == parent_id)
            .map(|(id, _, _)| id.clone())
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        let mut state = self.state.lock().unwrap();
        let id = format!("folder-{}", state.folders.len() + 1);
        state.folders.push((id.clone(), name.to_string(), parent_id.to_string()));
        Ok(id)
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content: Bytes,
        mime_type: &str,
    ) -> Result<StoredFile, StorageError> {
        let mut state = self.state.lock().unwrap();
        if let Some(rejected) = self.reject_uploads_in.as_deref() {
            let target = state.folders.iter().find(|(id, _, _)| id == parent_id);
            if target.is_some_and(|(_, folder_name, _)| folder_name == rejected) {
                return Err(StorageError::Api {
                    status: 403,
                    body: "storage quota exceeded".to_string(),
                });
            }
        }
        state.uploads.push(Upload {
            name: name.to_string(),
            folder: parent_id.to_string(),
            mime: mime_type.to_string(),
            size: content.len(),
        });
        let id = format!("file-{}", state.uploads.len());
        Ok(StoredFile {
            view_url: Some(format!("https://files.example.com/{id}")),
            id,
        })
    }

    fn folder_url(&self, folder_id: &str) -> Option<String> {
        Some(format!("https://files.example.com/folders/{folder_id}"))
    }

    fn label(&self) -> &str {
        "Recording store"
    }
}

// ── Metadata ──────────────────────────────────────────────────

/// Shared in-memory store that counts calls.
#[derive(Clone, Default)]
pub struct CountingMetadata {
    pub inner: Arc<MemoryMetadataStore>,
    pub inserts: Arc<AtomicUsize>,
    /// Ids reported as absent by `exists_by_external_id` even when present,
    /// as if another writer recorded them between check and insert.
    racing: Arc<HashSet<i64>>,
    failing_lookups: Arc<HashSet<i64>>,
    failing_inserts: Arc<HashSet<i64>>,
}

fn connection_reset() -> MetadataError {
    MetadataError::Connectivity("connection reset".to_string())
}

impl CountingMetadata {
    pub fn with_records(records: impl IntoIterator<Item = ImageRecord>) -> Self {
        Self {
            inner: Arc::new(MemoryMetadataStore::with_records(records)),
            ..Self::default()
        }
    }

    pub fn racing_on(mut self, ids: &[i64]) -> Self {
        self.racing = Arc::new(ids.iter().copied().collect());
        self
    }

    /// `exists_by_external_id` errors for these ids.
    pub fn failing_lookups_of(mut self, ids: &[i64]) -> Self {
        self.failing_lookups = Arc::new(ids.iter().copied().collect());
        self
    }

    /// `insert` errors for these ids.
    pub fn failing_inserts_of(mut self, ids: &[i64]) -> Self {
        self.failing_inserts = Arc::new(ids.iter().copied().collect());
        self
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for CountingMetadata {
    async fn exists_by_external_id(&self, external_id: i64) -> Result<bool, MetadataError> {
        if self.failing_lookups.contains(&external_id) {
            return Err(connection_reset());
        }
        if self.racing.contains(&external_id) {
            return Ok(false);
        }
        self.inner.exists_by_external_id(external_id).await
    }

    async fn insert(&self, record: &ImageRecord) -> Result<InsertOutcome, MetadataError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.failing_inserts.contains(&record.external_id) {
            return Err(connection_reset());
        }
        self.inner.insert(record).await
    }
}

// ── Setup ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeSetup {
    pub search: FakeSearch,
    pub files: RecordingFiles,
    pub metadata: CountingMetadata,
    unreachable: Option<String>,
    pub connects: Arc<AtomicUsize>,
}

impl FakeSetup {
    pub fn new(search: FakeSearch, files: RecordingFiles, metadata: CountingMetadata) -> Self {
        Self {
            search,
            files,
            metadata,
            ..Self::default()
        }
    }

    /// Metadata store refuses connections.
    pub fn unreachable(reason: &str) -> Self {
        Self {
            unreachable: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSetup for FakeSetup {
    async fn connect(&self, _config: &ZooConfig) -> Result<Services, SetupError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.unreachable {
            return Err(MetadataError::Connectivity(reason.clone()).into());
        }
        Ok(Services {
            search: Box::new(self.search.clone()),
            files: Box::new(self.files.clone()),
            metadata: Box::new(self.metadata.clone()),
        })
    }
}

// ── Mail ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<Notification>>>,
    should_fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|n| n.subject.clone()).collect()
    }

    pub fn body(&self, index: usize) -> String {
        self.sent.lock().unwrap()[index].html_body.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.should_fail {
            return Err(NotifyError::Smtp("535 authentication failed".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

pub fn job(config: ZooConfig, notifier: &RecordingNotifier) -> IngestJob {
    IngestJob::new(
        config,
        StatusMailer::new(Box::new(notifier.clone())),
        TemplateRenderer::new().unwrap(),
    )
}
