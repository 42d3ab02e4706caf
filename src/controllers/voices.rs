use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::shared::StatusEnvelope;
use crate::domain::voice::{NewVoiceRequest, Voice, VoiceCatalog, VoiceCatalogApi};
use crate::error::AppResult;

pub struct VoicesController {
    voice_catalog: Arc<VoiceCatalog>,
}

impl VoicesController {
    pub fn new(voice_catalog: Arc<VoiceCatalog>) -> Self {
        Self { voice_catalog }
    }

    /// GET /voices - Selectable voices
    pub async fn list(State(controller): State<Arc<VoicesController>>) -> AppResult<Json<Vec<Voice>>> {
        let voices = controller.voice_catalog.list().await?;
        Ok(Json(voices.as_ref().clone()))
    }

    /// POST /voices - Add a voice to the catalogue
    pub async fn add(
        State(controller): State<Arc<VoicesController>>,
        payload: Result<Json<NewVoiceRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<StatusEnvelope<Voice>>)> {
        let Json(request) = payload?;
        let voice = controller.voice_catalog.add(request).await?;
        Ok((StatusCode::CREATED, Json(StatusEnvelope::success(voice))))
    }
}
