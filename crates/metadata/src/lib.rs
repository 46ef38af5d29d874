//! Image metadata persistence and duplicate detection.
//!
//! [`MetadataStore`] is keyed by the search API's image id. The PostgreSQL
//! implementation owns the unique index that makes duplicate inserts
//! harmless; [`MemoryMetadataStore`] mirrors that rule in process.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::MetadataError;
pub use memory::MemoryMetadataStore;
pub use postgres::PgMetadataStore;
pub use store::{InsertOutcome, MetadataStore};
