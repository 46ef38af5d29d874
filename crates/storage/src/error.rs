use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The cached credential is missing or unusable; needs a manual setup run.
    #[error("{0}")]
    SetupRequired(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("invalid storage path: {0}")]
    Path(#[from] object_store::path::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not configured: {0}")]
    NotConfigured(String),
}
