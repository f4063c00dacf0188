use crate::services::bill_store::StoreError;
use crate::services::submission::SubmissionPhase;
use thiserror::Error;

pub use crate::utils::validation::ValidationError;

/// Why a bill submission stopped. Store failures display verbatim.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid bill: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),

    #[error("{cause}")]
    UploadFailed {
        #[source]
        cause: StoreError,
    },

    #[error("{cause}")]
    PersistFailed {
        #[source]
        cause: StoreError,
    },
}

impl SubmissionError {
    /// The step the workflow was in when it failed.
    pub fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionError::InvalidFields(_) => SubmissionPhase::Validating,
            SubmissionError::UploadFailed { .. } => SubmissionPhase::Uploading,
            SubmissionError::PersistFailed { .. } => SubmissionPhase::Persisting,
        }
    }

    pub fn cause(&self) -> Option<&StoreError> {
        match self {
            SubmissionError::UploadFailed { cause } | SubmissionError::PersistFailed { cause } => {
                Some(cause)
            }
            SubmissionError::InvalidFields(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("{0}")]
    FetchFailed(#[from] StoreError),
}
