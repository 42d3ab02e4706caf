use super::{NewVoice, NewVoiceRequest, Voice};
use crate::error::AppError;
use crate::infrastructure::repositories::VoiceRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const CATALOG_CACHE_KEY: &str = "voices";

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("voice already exists")]
    Conflict,
}

impl From<VoiceError> for AppError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Invalid(msg) => AppError::BadRequest(msg),
            VoiceError::Conflict => AppError::Conflict("Voice already exists".to_string()),
            VoiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

/// Read-mostly catalogue of selectable voices
pub struct VoiceCatalog {
    voice_repo: Arc<dyn VoiceRepository>,
    cache: Cache<&'static str, Arc<Vec<Voice>>>,
}

impl VoiceCatalog {
    pub fn new(voice_repo: Arc<dyn VoiceRepository>, cache_ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self { voice_repo, cache }
    }
}

#[async_trait]
pub trait VoiceCatalogApi: Send + Sync {
    async fn list(&self) -> Result<Arc<Vec<Voice>>, VoiceError>;

    async fn add(&self, request: NewVoiceRequest) -> Result<Voice, VoiceError>;
}

#[async_trait]
impl VoiceCatalogApi for VoiceCatalog {
    async fn list(&self) -> Result<Arc<Vec<Voice>>, VoiceError> {
        if let Some(voices) = self.cache.get(&CATALOG_CACHE_KEY).await {
            tracing::debug!(voices = voices.len(), "Voice catalogue cache hit");
            return Ok(voices);
        }

        let voices = Arc::new(
            self.voice_repo
                .list()
                .await
                .map_err(|e| VoiceError::Dependency(e.to_string()))?,
        );
        self.cache.insert(CATALOG_CACHE_KEY, voices.clone()).await;

        Ok(voices)
    }

    async fn add(&self, request: NewVoiceRequest) -> Result<Voice, VoiceError> {
        let new_voice = validate(request)?;

        let voice = self
            .voice_repo
            .insert(new_voice)
            .await
            .map_err(|e| VoiceError::Dependency(e.to_string()))?
            .ok_or(VoiceError::Conflict)?;

        self.cache.invalidate(&CATALOG_CACHE_KEY).await;
        tracing::info!(voice = %voice.name, "Voice added to catalogue");

        Ok(voice)
    }
}

fn validate(request: NewVoiceRequest) -> Result<NewVoice, VoiceError> {
    fn required(value: Option<String>, field: &str) -> Result<String, VoiceError> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| VoiceError::Invalid(format!("{} is required", field)))
    }

    Ok(NewVoice {
        name: required(request.name, "name")?,
        description: required(request.description, "description")?,
        voice_url: required(request.voice_url, "voiceUrl")?,
        image_url: required(request.image_url, "imageUrl")?,
    })
}
