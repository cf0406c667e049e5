//! Build the configured `BillStore`

use crate::memory_store::MemoryBillStore;
use phonebill_core::config::{StorageBackend, StorageConfig};
use phonebill_core::{AppResult, BillStore};
use phonebill_db::{create_pool, SqliteBillRepository};
use phonebill_text::TextFileStore;
use std::sync::Arc;
use tracing::info;

/// Create the store selected by `storage.backend`
pub async fn build_store(config: &StorageConfig) -> AppResult<Arc<dyn BillStore>> {
    let store: Arc<dyn BillStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryBillStore::new()),
        StorageBackend::Text => Arc::new(TextFileStore::new(config.require_text_dir()?.clone())),
        StorageBackend::Database => {
            let pool = create_pool(config.require_database_url()?, Some(config.max_connections)).await?;
            Arc::new(SqliteBillRepository::new(pool))
        }
    };

    info!("Using {} bill storage", store.backend_name());
    Ok(store)
}
