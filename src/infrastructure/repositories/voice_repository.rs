use crate::domain::voice::{NewVoice, Voice};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait VoiceRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Voice>>;

    /// `None` when a voice with the same name exists
    async fn insert(&self, new_voice: NewVoice) -> AppResult<Option<Voice>>;
}

pub struct PostgresVoiceRepository {
    pool: Arc<DbPool>,
}

impl PostgresVoiceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoiceRepository for PostgresVoiceRepository {
    async fn list(&self) -> AppResult<Vec<Voice>> {
        let pool = self.pool.as_ref();

        let voices = sqlx::query_as::<_, Voice>(
            r#"
            SELECT id, name, description, voice_url, image_url, created_at
            FROM voices
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(voices)
    }

    async fn insert(&self, new_voice: NewVoice) -> AppResult<Option<Voice>> {
        let pool = self.pool.as_ref();

        let voice = sqlx::query_as::<_, Voice>(
            r#"
            INSERT INTO voices (id, name, description, voice_url, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, description, voice_url, image_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_voice.name)
        .bind(&new_voice.description)
        .bind(&new_voice.voice_url)
        .bind(&new_voice.image_url)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(voice)
    }
}
