//! Image search and download via the Pixabay API.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport failure. The request URL is stripped so the API key never
    /// reaches logs or emails.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    /// Display-sized image, the one we download.
    #[serde(rename = "webformatURL")]
    pub image_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub user: String,
    #[serde(rename = "pageURL")]
    pub page_url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

/// Where images come from.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Photos matching `query`, page `page` of `per_page` results.
    async fn search(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<SearchHit>, SearchError>;

    async fn download(&self, url: &str) -> Result<Bytes, SearchError>;
}

pub struct PixabayClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PixabayClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            base_url,
        }
    }

    async fn check(response: Response) -> Result<Response, SearchError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(SearchError::Api { status, body })
    }
}

#[async_trait]
impl ImageSource for PixabayClient {
    async fn search(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("image_type", "photo"),
            ])
            .query(&[("per_page", per_page), ("page", page)])
            .send()
            .await?;

        let body: SearchResponse = Self::check(response).await?.json().await?;
        Ok(body.hits)
    }

    async fn download(&self, url: &str) -> Result<Bytes, SearchError> {
        let response = self.client.get(url).send().await?;
        Ok(Self::check(response).await?.bytes().await?)
    }
}
