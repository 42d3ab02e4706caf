use crate::domain::quota::ApiKey;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Storage of the provider key pool
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Insert a key with a zero counter; `None` when the key is already pooled
    async fn insert(&self, key: &str) -> AppResult<Option<ApiKey>>;

    async fn find_by_key(&self, key: &str) -> AppResult<Option<ApiKey>>;

    /// Oldest key whose counter is still below `max_usage`
    async fn find_first_available(&self, max_usage: i32) -> AppResult<Option<ApiKey>>;

    /// Increment the counter only while it is below `max_usage`.
    ///
    /// Returns `None` when no row matched, either because the key is unknown
    /// or because it is already exhausted.
    async fn increment_if_below(&self, key: &str, max_usage: i32) -> AppResult<Option<ApiKey>>;

    /// Zero every counter, returning the number of keys touched
    async fn reset_all(&self) -> AppResult<u64>;

    async fn list(&self) -> AppResult<Vec<ApiKey>>;
}

pub struct PostgresApiKeyRepository {
    pool: Arc<DbPool>,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn insert(&self, key: &str) -> AppResult<Option<ApiKey>> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        let inserted = sqlx::query_as::<_, ApiKey>(
            r#"
            INSERT INTO api_keys (id, key, usage_count, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $3)
            ON CONFLICT (key) DO NOTHING
            RETURNING id, key, usage_count, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(inserted)
    }

    async fn find_by_key(&self, key: &str) -> AppResult<Option<ApiKey>> {
        let pool = self.pool.as_ref();

        let found = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT id, key, usage_count, created_at, updated_at
            FROM api_keys
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(found)
    }

    async fn find_first_available(&self, max_usage: i32) -> AppResult<Option<ApiKey>> {
        let pool = self.pool.as_ref();

        let found = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT id, key, usage_count, created_at, updated_at
            FROM api_keys
            WHERE usage_count < $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(max_usage)
        .fetch_optional(pool)
        .await?;

        Ok(found)
    }

    async fn increment_if_below(&self, key: &str, max_usage: i32) -> AppResult<Option<ApiKey>> {
        let pool = self.pool.as_ref();

        let updated = sqlx::query_as::<_, ApiKey>(
            r#"
            UPDATE api_keys
            SET usage_count = usage_count + 1, updated_at = $3
            WHERE key = $1 AND usage_count < $2
            RETURNING id, key, usage_count, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(max_usage)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    async fn reset_all(&self) -> AppResult<u64> {
        let pool = self.pool.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET usage_count = 0, updated_at = $1
            "#,
        )
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> AppResult<Vec<ApiKey>> {
        let pool = self.pool.as_ref();

        let keys = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT id, key, usage_count, created_at, updated_at
            FROM api_keys
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(keys)
    }
}
