pub mod category;
pub mod config;
pub mod cursor;
pub mod error;
pub mod record;

pub use category::Category;
pub use config::ZooConfig;
pub use error::*;
pub use record::ImageRecord;
