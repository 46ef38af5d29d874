//! Daily image ingestion: search, upload, record, report.
//!
//! [`IngestJob`] runs one pass over the configured categories. External
//! services are reached through [`JobSetup`], which yields the search
//! client, file store and metadata store for the run.

pub mod job;
pub mod report;
pub mod search;
pub mod setup;

pub use job::{CategoryError, IngestJob, JobOutcome};
pub use report::{format_duration, RunReport};
pub use search::{ImageSource, PixabayClient, SearchError, SearchHit};
pub use setup::{JobSetup, LiveSetup, Services, SetupError};
