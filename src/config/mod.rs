use std::env;

/// Which bill store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// The Billed REST API
    Http,
    /// Process-local store, nothing survives a restart
    Memory,
}

impl StoreKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "http" | "api" => Some(StoreKind::Http),
            "memory" | "mem" => Some(StoreKind::Memory),
            _ => None,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct BilledConfig {
    /// Billed API base URL (default: "http://localhost:5678")
    pub api_url: String,

    /// Store backend: "http" or "memory" (default: "http")
    pub store: StoreKind,

    /// JWT sent as a bearer token, if any
    pub jwt: Option<String>,

    /// Email of the connected employee (default: "employee@test.tld")
    pub user_email: String,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl Default for BilledConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5678".to_string(),
            store: StoreKind::Http,
            jwt: None,
            user_email: "employee@test.tld".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl BilledConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_url: env::var("BILLED_API_URL").unwrap_or(default.api_url),

            store: match env::var("BILLED_STORE") {
                Ok(v) => StoreKind::parse(&v).unwrap_or_else(|| {
                    tracing::warn!("Unknown store type '{}', using http", v);
                    StoreKind::Http
                }),
                Err(_) => default.store,
            },

            jwt: env::var("BILLED_JWT").ok().filter(|v| !v.is_empty()),

            user_email: env::var("BILLED_USER_EMAIL").unwrap_or(default.user_email),

            request_timeout_secs: env::var("BILLED_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),
        }
    }

    /// In-memory store, no API needed
    pub fn development() -> Self {
        Self {
            store: StoreKind::Memory,
            ..Self::default()
        }
    }
}
