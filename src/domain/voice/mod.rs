pub mod service;

pub use service::{VoiceCatalog, VoiceCatalogApi, VoiceError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A prebuilt provider voice users can pick for a speaker
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub voice_url: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /voices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub voice_url: Option<String>,
    pub image_url: Option<String>,
}

/// Validated catalogue entry ready for insertion
#[derive(Debug, Clone)]
pub struct NewVoice {
    pub name: String,
    pub description: String,
    pub voice_url: String,
    pub image_url: String,
}
