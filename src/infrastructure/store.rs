use crate::config::{BilledConfig, StoreKind};
use crate::infrastructure::http_store::HttpBillStore;
use crate::infrastructure::memory_store::InMemoryBillStore;
use crate::services::bill_store::BillStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub fn setup_store(config: &BilledConfig) -> Result<Arc<dyn BillStore>> {
    match config.store {
        StoreKind::Http => {
            info!("☁️  Bill store: Billed API at {}", config.api_url);
            if config.jwt.is_none() {
                tracing::warn!("⚠️  BILLED_JWT is not set, requests will be anonymous");
            }
            Ok(Arc::new(HttpBillStore::new(config)?))
        }
        StoreKind::Memory => {
            info!("🧪 Bill store: in-memory (nothing is persisted)");
            Ok(Arc::new(InMemoryBillStore::new()))
        }
    }
}
