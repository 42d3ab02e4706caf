use crate::domain::bootcast::{BootCast, NewBootCast};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait BootCastRepository: Send + Sync {
    async fn insert(&self, new_cast: NewBootCast) -> AppResult<BootCast>;

    /// Non-deleted casts of an owner, newest first
    async fn find_by_owner(&self, uid: &str) -> AppResult<Vec<BootCast>>;

    async fn find_published(&self, limit: i64, offset: i64) -> AppResult<Vec<BootCast>>;

    async fn count_published(&self) -> AppResult<i64>;

    /// `None` when the cast does not exist, is deleted, or belongs to someone else
    async fn set_published(
        &self,
        id: Uuid,
        uid: &str,
        published: bool,
    ) -> AppResult<Option<BootCast>>;

    async fn soft_delete(&self, id: Uuid, uid: &str) -> AppResult<bool>;
}

pub struct PostgresBootCastRepository {
    pool: Arc<DbPool>,
}

impl PostgresBootCastRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BootCastRepository for PostgresBootCastRepository {
    async fn insert(&self, new_cast: NewBootCast) -> AppResult<BootCast> {
        let pool = self.pool.as_ref();
        let characters: Vec<String> = new_cast.characters.into();

        let cast = sqlx::query_as::<_, BootCast>(
            r#"
            INSERT INTO bootcasts (id, uid, bootcast_name, name1, name2, characters, content, link, is_deleted, is_published, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, FALSE, $9)
            RETURNING id, uid, bootcast_name, name1, name2, characters, content, link, is_deleted, is_published, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_cast.uid)
        .bind(&new_cast.bootcast_name)
        .bind(&new_cast.name1)
        .bind(&new_cast.name2)
        .bind(&characters)
        .bind(&new_cast.content)
        .bind(&new_cast.link)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(cast)
    }

    async fn find_by_owner(&self, uid: &str) -> AppResult<Vec<BootCast>> {
        let pool = self.pool.as_ref();

        let casts = sqlx::query_as::<_, BootCast>(
            r#"
            SELECT id, uid, bootcast_name, name1, name2, characters, content, link, is_deleted, is_published, created_at
            FROM bootcasts
            WHERE uid = $1 AND NOT is_deleted
            ORDER BY created_at DESC
            "#,
        )
        .bind(uid)
        .fetch_all(pool)
        .await?;

        Ok(casts)
    }

    async fn find_published(&self, limit: i64, offset: i64) -> AppResult<Vec<BootCast>> {
        let pool = self.pool.as_ref();

        let casts = sqlx::query_as::<_, BootCast>(
            r#"
            SELECT id, uid, bootcast_name, name1, name2, characters, content, link, is_deleted, is_published, created_at
            FROM bootcasts
            WHERE is_published AND NOT is_deleted
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(casts)
    }

    async fn count_published(&self) -> AppResult<i64> {
        let pool = self.pool.as_ref();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bootcasts WHERE is_published AND NOT is_deleted
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    async fn set_published(
        &self,
        id: Uuid,
        uid: &str,
        published: bool,
    ) -> AppResult<Option<BootCast>> {
        let pool = self.pool.as_ref();

        let cast = sqlx::query_as::<_, BootCast>(
            r#"
            UPDATE bootcasts
            SET is_published = $3
            WHERE id = $1 AND uid = $2 AND NOT is_deleted
            RETURNING id, uid, bootcast_name, name1, name2, characters, content, link, is_deleted, is_published, created_at
            "#,
        )
        .bind(id)
        .bind(uid)
        .bind(published)
        .fetch_optional(pool)
        .await?;

        Ok(cast)
    }

    async fn soft_delete(&self, id: Uuid, uid: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE bootcasts
            SET is_deleted = TRUE, is_published = FALSE
            WHERE id = $1 AND uid = $2 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .bind(uid)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
