use crate::config::BilledConfig;
use crate::models::{AcceptedFile, Bill, StoredFile};
use crate::services::bill_store::{BillStore, StoreError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Bill store backed by the Billed REST API.
pub struct HttpBillStore {
    client: Client,
    base_url: Url,
    jwt: Option<String>,
}

impl HttpBillStore {
    pub fn new(config: &BilledConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(format!("HTTP client setup failed: {}", e)))?;

        let base_url = Url::parse(&config.api_url).map_err(|e| {
            StoreError::Transport(format!("Invalid API URL '{}': {}", config.api_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!(
                "Invalid API URL '{}'",
                config.api_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            jwt: config.jwt.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T>(&self, request: RequestBuilder, label: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Billed API {} failed with status {}", label, status);
            return Err(StoreError::Status {
                code: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn create(&self, file: &AcceptedFile, email: &str) -> Result<StoredFile, StoreError> {
        let url = self.endpoint(&["bills"]);
        tracing::info!("Uploading receipt '{}' to {}", file.file_name(), url);

        let part = Part::bytes(file.data().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.content_type().as_ref())
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("email", email.to_string());

        self.send(self.client.post(url).multipart(form), "POST /bills")
            .await
    }

    async fn update(&self, key: Option<&str>, bill: &Bill) -> Result<Bill, StoreError> {
        match key {
            Some(key) => {
                let url = self.endpoint(&["bills", key]);
                tracing::info!("Saving bill {} to {}", key, url);
                self.send(self.client.patch(url).json(bill), "PATCH /bills/:id")
                    .await
            }
            None => {
                let url = self.endpoint(&["bills"]);
                tracing::info!("Creating bill without receipt at {}", url);
                self.send(self.client.post(url).json(bill), "POST /bills")
                    .await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let url = self.endpoint(&["bills"]);
        tracing::debug!("Fetching bills from {}", url);
        self.send(self.client.get(url), "GET /bills").await
    }
}
