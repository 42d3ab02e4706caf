pub mod error;
pub mod model;
pub mod service;

pub use error::QuotaError;
pub use model::{ApiKey, DEFAULT_MAX_USAGE};
pub use service::{QuotaLedger, QuotaLedgerApi};

use serde::{Deserialize, Serialize};

/// Body of POST and PATCH /keys
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyRequest {
    pub key: Option<String>,
}

/// Key as exposed over HTTP, secret masked
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyView {
    pub id: uuid::Uuid,
    pub key: String,
    pub usage_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ApiKey> for ApiKeyView {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            key: key.masked(),
            usage_count: key.usage_count,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

/// Response of POST /keys
#[derive(Debug, Serialize, Deserialize)]
pub struct KeySavedResponse {
    pub message: String,
    pub key: String,
}

/// Response of PATCH /keys
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyUpdatedResponse {
    pub message: String,
    pub data: ApiKeyView,
}

/// `data` of POST /keys/reset
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetSummary {
    pub reset: u64,
}
