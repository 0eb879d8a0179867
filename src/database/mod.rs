pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod scoped;
pub mod store;

use std::sync::Arc;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use scoped::{find_owned, Scoped};
pub use store::{Store, StoreError, StoreResult};

use crate::config::{DatabaseConfig, StoreBackend};

/// Construct the store handle selected by configuration.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StoreBackend::Postgres => Ok(Arc::new(PgStore::connect(config).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost when the process exits");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
