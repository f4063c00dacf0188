use crate::error::{SubmissionError, ValidationError};
use crate::models::{AcceptedFile, Bill, BillFields, Route, UploadedFile, UserContext};
use crate::services::bill_store::BillStore;
use crate::utils::validation;
use std::sync::Arc;
use validator::Validate;

/// Presentation-layer hook used to leave the form once a bill is saved.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Steps of a single submission. Uploading is skipped when no receipt is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Uploading,
    Persisting,
    Succeeded,
    Failed,
}

/// Turns a validated receipt and the form values into a saved bill.
///
/// Each `submit` call runs its own upload-then-persist pipeline. Calls are not
/// deduplicated, so submitting the same form twice creates two bills.
pub struct BillSubmissionWorkflow {
    store: Arc<dyn BillStore>,
    user: UserContext,
    navigator: Arc<dyn Navigator>,
}

impl BillSubmissionWorkflow {
    pub fn new(store: Arc<dyn BillStore>, user: UserContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            user,
            navigator,
        }
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    /// Checks the receipt type. The caller should clear its file input on error.
    pub fn validate_file(&self, file: UploadedFile) -> Result<AcceptedFile, ValidationError> {
        validation::validate_file(file)
    }

    /// Uploads the receipt (if any), then saves the bill. Navigates to the bill list
    /// only when both steps succeed.
    pub async fn submit(
        &self,
        fields: BillFields,
        file: Option<AcceptedFile>,
    ) -> Result<Bill, SubmissionError> {
        enter(SubmissionPhase::Idle);

        match self.run(fields, file).await {
            Ok(bill) => {
                enter(SubmissionPhase::Succeeded);
                tracing::info!(
                    "Bill {} saved for {}",
                    bill.id.as_deref().unwrap_or("<unassigned>"),
                    self.user.email
                );
                self.navigator.navigate(Route::Bills);
                Ok(bill)
            }
            Err(e) => {
                enter(SubmissionPhase::Failed);
                tracing::error!("Bill submission failed during {:?}: {}", e.phase(), e);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        fields: BillFields,
        file: Option<AcceptedFile>,
    ) -> Result<Bill, SubmissionError> {
        enter(SubmissionPhase::Validating);
        fields.validate()?;

        let receipt = match file {
            Some(file) => {
                enter(SubmissionPhase::Uploading);
                let stored = self
                    .store
                    .create(&file, &self.user.email)
                    .await
                    .map_err(|cause| SubmissionError::UploadFailed { cause })?;
                tracing::debug!("Receipt '{}' stored at {}", file.file_name(), stored.file_url);
                Some((stored, file.file_name().to_string()))
            }
            None => None,
        };

        let key = receipt.as_ref().map(|(stored, _)| stored.key.clone());
        let bill = fields.into_bill(&self.user.email, receipt);

        enter(SubmissionPhase::Persisting);
        self.store
            .update(key.as_deref(), &bill)
            .await
            .map_err(|cause| {
                if let Some(key) = &key {
                    // No compensating delete: the uploaded receipt stays behind.
                    tracing::warn!("Receipt under key {} is orphaned after failed save", key);
                }
                SubmissionError::PersistFailed { cause }
            })
    }
}

fn enter(phase: SubmissionPhase) {
    tracing::debug!("Bill submission phase: {:?}", phase);
}
