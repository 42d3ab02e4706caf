use super::error::QuotaError;
use super::model::{mask_key, ApiKey};
use crate::infrastructure::repositories::ApiKeyRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Tracks the pool of provider keys and how often each one was used today
pub struct QuotaLedger {
    key_repo: Arc<dyn ApiKeyRepository>,
    max_usage: i32,
}

impl QuotaLedger {
    pub fn new(key_repo: Arc<dyn ApiKeyRepository>, max_usage: i32) -> Self {
        Self {
            key_repo,
            max_usage,
        }
    }

    pub fn max_usage(&self) -> i32 {
        self.max_usage
    }
}

#[async_trait]
pub trait QuotaLedgerApi: Send + Sync {
    /// Select the oldest key still below the usage cap, if any
    async fn acquire_key(&self) -> Result<Option<ApiKey>, QuotaError>;

    /// Count one synthesis against a key.
    ///
    /// The increment is a single conditional write, so a key can never be
    /// pushed past the cap by concurrent callers or by a reset racing with it.
    async fn record_usage(&self, key: &str) -> Result<ApiKey, QuotaError>;

    /// Add a new key to the pool
    async fn register_key(&self, key: &str) -> Result<ApiKey, QuotaError>;

    /// Zero the usage counter of every key, returning how many were reset
    async fn reset_all(&self) -> Result<u64, QuotaError>;

    async fn list_keys(&self) -> Result<Vec<ApiKey>, QuotaError>;
}

#[async_trait]
impl QuotaLedgerApi for QuotaLedger {
    async fn acquire_key(&self) -> Result<Option<ApiKey>, QuotaError> {
        let key = self
            .key_repo
            .find_first_available(self.max_usage)
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))?;

        match &key {
            Some(k) => tracing::debug!(
                key = %k.masked(),
                usage_count = k.usage_count,
                max_usage = self.max_usage,
                "API key acquired"
            ),
            None => tracing::warn!(max_usage = self.max_usage, "No API key available"),
        }

        Ok(key)
    }

    async fn record_usage(&self, key: &str) -> Result<ApiKey, QuotaError> {
        let key = validate_key(key)?;

        if let Some(updated) = self
            .key_repo
            .increment_if_below(key, self.max_usage)
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))?
        {
            tracing::info!(
                key = %updated.masked(),
                usage_count = updated.usage_count,
                "API key usage recorded"
            );
            return Ok(updated);
        }

        // Nothing was updated: either the key is unknown or it is at the cap
        let existing = self
            .key_repo
            .find_by_key(key)
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))?;

        match existing {
            None => Err(QuotaError::NotFound),
            Some(k) => {
                tracing::warn!(
                    key = %k.masked(),
                    usage_count = k.usage_count,
                    "API key already exhausted"
                );
                Err(QuotaError::Exhausted)
            }
        }
    }

    async fn register_key(&self, key: &str) -> Result<ApiKey, QuotaError> {
        let key = validate_key(key)?;

        let created = self
            .key_repo
            .insert(key)
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))?
            .ok_or(QuotaError::AlreadyExists)?;

        tracing::info!(key = %mask_key(key), "API key registered");
        Ok(created)
    }

    async fn reset_all(&self) -> Result<u64, QuotaError> {
        let reset = self
            .key_repo
            .reset_all()
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))?;

        tracing::info!(keys_reset = reset, "API key usage reset");
        Ok(reset)
    }

    async fn list_keys(&self) -> Result<Vec<ApiKey>, QuotaError> {
        self.key_repo
            .list()
            .await
            .map_err(|e| QuotaError::Dependency(e.to_string()))
    }
}

fn validate_key(key: &str) -> Result<&str, QuotaError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(QuotaError::Invalid("Key is required".to_string()));
    }
    Ok(key)
}
