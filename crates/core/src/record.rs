use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata persisted for every uploaded image.
///
/// `external_id` is the search API's image id and is unique across the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub external_id: i64,
    pub category: String,
    pub tags: String,
    pub author: String,
    /// View URL of the uploaded file, when the store hands one out.
    pub storage_url: Option<String>,
    pub date_added: NaiveDate,
    pub source_url: String,
}
