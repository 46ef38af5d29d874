use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::{parse_categories, Category, DEFAULT_CATEGORIES};
use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like the other numeric readers, but a malformed value is an error
/// instead of the default.
fn profiled_env_u32_strict(profile: &str, key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

/// First day of the project; page 1 of the search results belongs to it.
pub const DEFAULT_PROJECT_START: (i32, u32, u32) = (2025, 12, 24);

fn default_project_start() -> NaiveDate {
    let (y, m, d) = DEFAULT_PROJECT_START;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

// ── Top-level config ──────────────────────────────────────────

/// Everything the job needs, resolved once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZooConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub aws: AwsConfig,
    pub metadata: MetadataConfig,
    pub email: EmailConfig,
    pub job: JobConfig,
}

impl ZooConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ZOO_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    ///
    /// Absent values are left for the accessors to report; values that are
    /// present but malformed are rejected here.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = env_or("ZOO_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            search: SearchConfig::from_env_profiled(p)?,
            storage: StorageConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
            metadata: MetadataConfig::from_env_profiled(p),
            email: EmailConfig::from_env_profiled(p),
            job: JobConfig::from_env_profiled(p)?,
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  search:      url={}, per_page={}, key={}",
            self.search.base_url,
            self.search.per_page,
            set_or_missing(self.search.api_key.is_some())
        );
        tracing::info!(
            "  storage:     backend={}, root={}, s3={}",
            self.storage.backend,
            self.storage.root_folder_id.as_deref().unwrap_or("(none)"),
            set_or_missing(self.aws.is_configured())
        );
        tracing::info!(
            "  metadata:    url={}",
            set_or_missing(self.metadata.database_url.is_some())
        );
        tracing::info!(
            "  email:       host={}:{}, enabled={}",
            self.email.smtp_host,
            self.email.smtp_port,
            self.email.is_configured()
        );
        tracing::info!(
            "  job:         start={}, categories={}, delay={}ms",
            self.job.project_start,
            self.job.categories.len(),
            self.job.upload_delay.as_millis()
        );
    }
}

fn set_or_missing(set: bool) -> &'static str {
    if set { "set" } else { "(missing)" }
}

// ── Image search ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Results requested per category and run.
    pub per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://pixabay.com/api/".to_string(),
            per_page: 5,
        }
    }
}

/// Page sizes the search API accepts.
pub const PER_PAGE_RANGE: RangeInclusive<u32> = 3..=200;

impl SearchConfig {
    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            api_key: profiled_env_opt(p, "PIXABAY_KEY"),
            base_url: profiled_env_or(p, "PIXABAY_BASE_URL", &defaults.base_url),
            per_page: profiled_env_u32_strict(p, "IMAGES_PER_DAY", defaults.per_page)?,
        };
        config.per_page()?;
        Ok(config)
    }

    /// Results per search, checked against [`PER_PAGE_RANGE`].
    pub fn per_page(&self) -> Result<u32, ConfigError> {
        if PER_PAGE_RANGE.contains(&self.per_page) {
            Ok(self.per_page)
        } else {
            Err(ConfigError::Invalid {
                key: "IMAGES_PER_DAY",
                reason: format!(
                    "{} is outside {}..={}",
                    self.per_page,
                    PER_PAGE_RANGE.start(),
                    PER_PAGE_RANGE.end()
                ),
            })
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::Missing("PIXABAY_KEY"))
    }
}

// ── File storage ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "drive", "local", "s3"
    pub backend: String,
    /// Folder that holds one subfolder per category.
    pub root_folder_id: Option<String>,
    /// Cached OAuth credential for the Drive backend.
    pub token_path: PathBuf,
    /// Root directory of the local backend.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "drive".to_string(),
            root_folder_id: None,
            token_path: PathBuf::from("token.json"),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            backend: profiled_env_or(p, "STORAGE_BACKEND", "drive").to_lowercase(),
            root_folder_id: profiled_env_opt(p, "DRIVE_FOLDER_ID"),
            token_path: PathBuf::from(profiled_env_or(p, "DRIVE_TOKEN_PATH", "token.json")),
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data")),
        }
    }

    pub fn root_folder_id(&self) -> Result<&str, ConfigError> {
        self.root_folder_id
            .as_deref()
            .ok_or(ConfigError::Missing("DRIVE_FOLDER_ID"))
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub s3_bucket: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            s3_bucket: None,
            endpoint_url: None,
        }
    }
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            s3_bucket: profiled_env_opt(p, "S3_BUCKET"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key_id.is_some() && self.s3_bucket.is_some()
    }
}

// ── Metadata database ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
        }
    }
}

impl MetadataConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            database_url: profiled_env_opt(p, "DATABASE_URL"),
            max_connections: profiled_env_u32(p, "DB_MAX_CONNECTIONS", 5),
        }
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

// ── Email ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub sender: Option<String>,
    pub password: Option<String>,
    pub receiver: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender: None,
            password: None,
            receiver: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
        }
    }
}

impl EmailConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            sender: profiled_env_opt(p, "EMAIL_SENDER"),
            password: profiled_env_opt(p, "EMAIL_PASSWORD"),
            receiver: profiled_env_opt(p, "EMAIL_RECEIVER"),
            smtp_host: profiled_env_or(p, "SMTP_HOST", "smtp.gmail.com"),
            smtp_port: profiled_env_u16(p, "SMTP_PORT", 587),
        }
    }

    /// Email is sent only when sender, password and receiver are all present.
    pub fn is_configured(&self) -> bool {
        self.sender.is_some() && self.password.is_some() && self.receiver.is_some()
    }
}

// ── Job ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub project_start: NaiveDate,
    /// Pause after every uploaded image.
    pub upload_delay: Duration,
    pub categories: Vec<Category>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            project_start: default_project_start(),
            upload_delay: Duration::from_secs(1),
            categories: DEFAULT_CATEGORIES.iter().copied().map(Category::new).collect(),
        }
    }
}

impl JobConfig {
    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        // The page cursor counts from this date; never default a malformed one.
        let project_start = match profiled_env_opt(p, "PROJECT_START_DATE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ConfigError::Invalid {
                key: "PROJECT_START_DATE",
                reason: format!("'{raw}': {e}"),
            })?,
            None => default_project_start(),
        };

        let categories = profiled_env_opt(p, "ZOO_CATEGORIES")
            .map(|raw| parse_categories(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().copied().map(Category::new).collect());

        Ok(Self {
            project_start,
            upload_delay: Duration::from_millis(profiled_env_u64(p, "UPLOAD_DELAY_MS", 1000)),
            categories,
        })
    }
}
