//! Cached OAuth credential for the Drive backend.
//!
//! The cache is a Google "authorized user" JSON file written once by an
//! interactive consent flow outside this job. A valid access token is used
//! as is; an expired one is refreshed with the stored refresh token and the
//! file is rewritten. Anything else needs the manual setup step again.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::StorageError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 180;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Contents of the cached credential file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expiry: Option<DateTime<Utc>>,
    /// Fields we don't use but must write back unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Valid,
    NeedsRefresh,
    Unusable,
}

impl AuthorizedUser {
    pub fn state(&self, now: DateTime<Utc>) -> CredentialState {
        let expired = self
            .expiry
            .is_some_and(|expiry| now >= expiry - Duration::seconds(EXPIRY_SKEW_SECS));

        match (&self.token, expired, &self.refresh_token) {
            (Some(_), false, _) => CredentialState::Valid,
            (_, _, Some(_)) => CredentialState::NeedsRefresh,
            _ => CredentialState::Unusable,
        }
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
}

fn setup_required(path: &Path, reason: &str) -> StorageError {
    StorageError::SetupRequired(format!(
        "'{}' {reason}! Run the one-time token setup first.",
        path.display()
    ))
}

/// Read the cached credential at `path` and return a usable access token,
/// refreshing it when expired.
pub async fn authorize(path: &Path, client: &reqwest::Client) -> Result<String, StorageError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(setup_required(path, "missing"));
        }
        Err(e) => return Err(StorageError::Io(e)),
    };
    let mut user: AuthorizedUser = serde_json::from_str(&raw)?;

    match user.state(Utc::now()) {
        CredentialState::Valid => match user.token {
            Some(token) => Ok(token),
            None => Err(setup_required(path, "has no access token")),
        },
        CredentialState::NeedsRefresh => {
            info!("Refreshing expired storage token...");
            let token = refresh(&mut user, client).await?;
            if let Err(e) = persist(path, &user).await {
                warn!(path = %path.display(), error = %e, "Could not save refreshed token");
            }
            Ok(token)
        }
        CredentialState::Unusable => Err(setup_required(path, "is expired and has no refresh token")),
    }
}

async fn refresh(user: &mut AuthorizedUser, client: &reqwest::Client) -> Result<String, StorageError> {
    let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
        user.refresh_token.as_deref(),
        user.client_id.as_deref(),
        user.client_secret.as_deref(),
    ) else {
        return Err(StorageError::Auth(
            "refresh needs refresh_token, client_id and client_secret".to_string(),
        ));
    };

    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = client.post(&user.token_uri).form(&params).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(StorageError::Auth(format!("token refresh rejected ({status}): {body}")));
    }

    let refreshed: RefreshResponse = response.json().await?;
    user.token = Some(refreshed.access_token.clone());
    user.expiry = refreshed
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs));

    Ok(refreshed.access_token)
}

async fn persist(path: &Path, user: &AuthorizedUser) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(user)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
