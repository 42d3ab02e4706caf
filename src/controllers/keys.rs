use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::quota::{
    ApiKeyView, KeyRequest, KeySavedResponse, KeyUpdatedResponse, QuotaLedger, QuotaLedgerApi,
    ResetSummary,
};
use crate::domain::shared::SuccessEnvelope;
use crate::error::AppResult;

pub struct KeysController {
    quota_ledger: Arc<QuotaLedger>,
}

impl KeysController {
    pub fn new(quota_ledger: Arc<QuotaLedger>) -> Self {
        Self { quota_ledger }
    }

    /// POST /keys - Add a provider key to the pool
    pub async fn register(
        State(controller): State<Arc<KeysController>>,
        payload: Result<Json<KeyRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<KeySavedResponse>)> {
        let Json(request) = payload?;
        let key = controller
            .quota_ledger
            .register_key(request.key.as_deref().unwrap_or_default())
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(KeySavedResponse {
                message: "Key saved successfully".to_string(),
                key: key.masked(),
            }),
        ))
    }

    /// GET /keys - First key still below the usage cap, or null
    pub async fn available(
        State(controller): State<Arc<KeysController>>,
    ) -> AppResult<Json<SuccessEnvelope<Option<ApiKeyView>>>> {
        let key = controller.quota_ledger.acquire_key().await?;
        Ok(Json(SuccessEnvelope::ok(key.map(ApiKeyView::from))))
    }

    /// GET /keys/all - Whole pool with usage counters
    pub async fn list(
        State(controller): State<Arc<KeysController>>,
    ) -> AppResult<Json<SuccessEnvelope<Vec<ApiKeyView>>>> {
        let keys = controller.quota_ledger.list_keys().await?;
        Ok(Json(SuccessEnvelope::ok(
            keys.into_iter().map(ApiKeyView::from).collect(),
        )))
    }

    /// PATCH /keys - Count one use of a key
    pub async fn record_usage(
        State(controller): State<Arc<KeysController>>,
        payload: Result<Json<KeyRequest>, JsonRejection>,
    ) -> AppResult<Json<KeyUpdatedResponse>> {
        let Json(request) = payload?;
        let key = controller
            .quota_ledger
            .record_usage(request.key.as_deref().unwrap_or_default())
            .await?;

        Ok(Json(KeyUpdatedResponse {
            message: "Key usage updated successfully".to_string(),
            data: key.into(),
        }))
    }

    /// POST /keys/reset - Manual daily reset
    pub async fn reset(
        State(controller): State<Arc<KeysController>>,
    ) -> AppResult<Json<SuccessEnvelope<ResetSummary>>> {
        let reset = controller.quota_ledger.reset_all().await?;
        Ok(Json(SuccessEnvelope::ok(ResetSummary { reset })))
    }
}
