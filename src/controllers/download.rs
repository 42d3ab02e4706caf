use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::shared::StatusEnvelope;
use crate::error::{AppError, AppResult};
use crate::infrastructure::storage::{AudioStorage, DOWNLOAD_URL_TTL_SECS};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_url: String,
    pub file_name: String,
}

pub struct DownloadController {
    storage: Arc<dyn AudioStorage>,
}

impl DownloadController {
    pub fn new(storage: Arc<dyn AudioStorage>) -> Self {
        Self { storage }
    }

    /// POST /download - Time-limited link to a stored BootCast
    pub async fn download(
        State(controller): State<Arc<DownloadController>>,
        payload: Result<Json<DownloadRequest>, JsonRejection>,
    ) -> AppResult<Json<StatusEnvelope<DownloadResponse>>> {
        let Json(request) = payload?;
        let file_name = request
            .file_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::BadRequest("File name is required".to_string()))?;

        let download_url = controller
            .storage
            .signed_url(&file_name, DOWNLOAD_URL_TTL_SECS)
            .await?;

        Ok(Json(StatusEnvelope::success(DownloadResponse {
            download_url,
            file_name,
        })))
    }
}
