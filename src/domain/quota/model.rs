use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Default number of syntheses a provider key may serve per day
pub const DEFAULT_MAX_USAGE: i32 = 16;

/// A pooled credential for the generative AI provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: Uuid,
    pub key: String,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn is_available(&self, max_usage: i32) -> bool {
        self.usage_count < max_usage
    }

    /// Key with everything but a short prefix hidden, safe for logs and listings
    pub fn masked(&self) -> String {
        mask_key(&self.key)
    }
}

pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}****", prefix)
}
