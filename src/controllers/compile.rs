use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::compile::{
    CompilationPipeline, CompilationPipelineApi, CompileRequest, CompileResponse,
};
use crate::domain::shared::StatusEnvelope;
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct CompileController {
    pipeline: Arc<CompilationPipeline>,
}

impl CompileController {
    pub fn new(pipeline: Arc<CompilationPipeline>) -> Self {
        Self { pipeline }
    }

    /// POST /compile - Generate a BootCast
    pub async fn compile(
        State(controller): State<Arc<CompileController>>,
        Extension(auth_user): Extension<AuthUser>,
        payload: Result<Json<CompileRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<StatusEnvelope<CompileResponse>>)> {
        let Json(request) = payload?;
        let cast = controller
            .pipeline
            .compile(&auth_user.uid, &auth_user.email, request)
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(StatusEnvelope::success(cast.into())),
        ))
    }
}
