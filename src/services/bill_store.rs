use crate::models::{AcceptedFile, Bill, StoredFile};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a bill store. `Status` displays the way the Billed UI shows
/// API errors ("Erreur 404").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Erreur {code}")]
    Status { code: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StoreError::Status { code } => Some(*code),
            _ => None,
        }
    }
}

/// Remote collaborator that keeps receipts and bills.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Uploads a receipt for `email`. The returned key identifies the bill draft the
    /// receipt is attached to.
    async fn create(&self, file: &AcceptedFile, email: &str) -> Result<StoredFile, StoreError>;

    /// Upserts a bill: updates the draft behind `key`, or creates a new bill when
    /// there is no key.
    async fn update(&self, key: Option<&str>, bill: &Bill) -> Result<Bill, StoreError>;

    /// All bills visible to the current user.
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;
}
