use std::sync::Arc;

use sqlx::MySqlPool;
use tracing::info;

use crate::store::memory::MemoryStore;
use crate::store::mysql::MySqlStore;
use crate::store::{EmployeeStore, LeaveStore};

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Builds the store pair behind the service. With a DATABASE_URL both traits
/// are served by MySQL; without one everything lives in process memory.
pub async fn init_stores(
    database_url: Option<&str>,
) -> (Arc<dyn EmployeeStore>, Arc<dyn LeaveStore>) {
    match database_url {
        Some(url) => {
            let pool = init_db(url).await;
            info!("Using MySQL store");
            let store = Arc::new(MySqlStore::new(pool));
            (store.clone(), store)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    }
}
