use crate::models::{AcceptedFile, Bill, StoredFile};
use crate::services::bill_store::{BillStore, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

/// Receipt held by the in-memory store until its bill is saved.
#[derive(Debug, Clone)]
pub struct StoredReceipt {
    pub email: String,
    pub file_name: String,
    pub data: Bytes,
}

/// Process-local bill store for development and tests.
#[derive(Default)]
pub struct InMemoryBillStore {
    bills: DashMap<String, Bill>,
    receipts: DashMap<String, StoredReceipt>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Bills without an id get a fresh one.
    pub fn with_bills(bills: impl IntoIterator<Item = Bill>) -> Self {
        let store = Self::new();
        for mut bill in bills {
            let id = bill
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            bill.id = Some(id.clone());
            store.bills.insert(id, bill);
        }
        store
    }

    pub fn receipt(&self, key: &str) -> Option<StoredReceipt> {
        self.receipts.get(key).map(|r| r.value().clone())
    }

    pub fn bill(&self, id: &str) -> Option<Bill> {
        self.bills.get(id).map(|b| b.value().clone())
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn create(&self, file: &AcceptedFile, email: &str) -> Result<StoredFile, StoreError> {
        let key = Uuid::new_v4().to_string();
        let file_url = format!("memory://bills/{}/{}", key, file.file_name());

        self.receipts.insert(
            key.clone(),
            StoredReceipt {
                email: email.to_string(),
                file_name: file.file_name().to_string(),
                data: file.data().clone(),
            },
        );
        tracing::debug!("Stored receipt {} ({} bytes)", key, file.data().len());

        Ok(StoredFile { file_url, key })
    }

    async fn update(&self, key: Option<&str>, bill: &Bill) -> Result<Bill, StoreError> {
        let id = match key {
            Some(key) if self.receipts.contains_key(key) || self.bills.contains_key(key) => {
                key.to_string()
            }
            Some(key) => {
                tracing::warn!("Update for unknown bill key {}", key);
                return Err(StoreError::Status { code: 404 });
            }
            None => Uuid::new_v4().to_string(),
        };

        let mut saved = bill.clone();
        saved.id = Some(id.clone());
        self.bills.insert(id, saved.clone());
        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        Ok(self.bills.iter().map(|b| b.value().clone()).collect())
    }
}
