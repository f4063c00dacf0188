pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::BilledConfig;
use crate::models::UserContext;
use crate::services::bill_store::BillStore;
use crate::services::bills::BillsService;
use crate::services::submission::{BillSubmissionWorkflow, Navigator};
use std::sync::Arc;

pub use crate::error::{ListError, SubmissionError, ValidationError};
pub use crate::models::{AcceptedFile, Bill, BillFields, BillStatus, Route, UploadedFile};
pub use crate::services::bill_store::StoreError;

/// Everything a front-end needs to run the employee views.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BillStore>,
    pub user: UserContext,
    pub config: BilledConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn BillStore>, config: BilledConfig) -> Self {
        let user = UserContext::new(config.user_email.clone());
        Self {
            store,
            user,
            config,
        }
    }

    pub fn submission_workflow(&self, navigator: Arc<dyn Navigator>) -> BillSubmissionWorkflow {
        BillSubmissionWorkflow::new(self.store.clone(), self.user.clone(), navigator)
    }

    pub fn bills_service(&self) -> BillsService {
        BillsService::new(self.store.clone())
    }
}
