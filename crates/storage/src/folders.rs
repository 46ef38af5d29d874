use tracing::{debug, info};

use crate::error::StorageError;
use crate::traits::FileStore;

/// Id of the folder `name` under `parent_id`, creating it when absent.
///
/// With several same-named folders the first one the backend lists wins.
pub async fn get_or_create(
    store: &dyn FileStore,
    name: &str,
    parent_id: &str,
) -> Result<String, StorageError> {
    if let Some(id) = store.find_folders(name, parent_id).await?.into_iter().next() {
        debug!(folder = name, id = %id, "Using existing folder");
        return Ok(id);
    }

    let id = store.create_folder(name, parent_id).await?;
    info!(folder = name, id = %id, "Created folder");
    Ok(id)
}
