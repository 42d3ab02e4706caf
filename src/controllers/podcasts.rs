use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::bootcast::{
    BootCast, BootCastService, BootCastServiceApi, ExplorePage, ExploreQuery, OwnerQuery,
    PublishRequest,
};
use crate::domain::shared::{StatusEnvelope, SuccessEnvelope};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct PodcastsController {
    bootcast_service: Arc<BootCastService>,
}

impl PodcastsController {
    pub fn new(bootcast_service: Arc<BootCastService>) -> Self {
        Self { bootcast_service }
    }

    /// GET /podcasts?uid= - BootCasts of one owner
    pub async fn list_for_owner(
        State(controller): State<Arc<PodcastsController>>,
        Query(query): Query<OwnerQuery>,
    ) -> AppResult<Json<SuccessEnvelope<Vec<BootCast>>>> {
        let casts = controller
            .bootcast_service
            .list_for_owner(query.uid.as_deref().unwrap_or_default())
            .await?;
        Ok(Json(SuccessEnvelope::ok(casts)))
    }

    /// GET /explore - Published BootCasts, newest first
    pub async fn explore(
        State(controller): State<Arc<PodcastsController>>,
        Query(query): Query<ExploreQuery>,
    ) -> AppResult<Json<StatusEnvelope<ExplorePage>>> {
        let page = controller
            .bootcast_service
            .list_published(query.page, query.per_page)
            .await?;
        Ok(Json(StatusEnvelope::success(page)))
    }

    /// PATCH /podcasts/{id}/publish - Show or hide on the explore page
    pub async fn set_published(
        State(controller): State<Arc<PodcastsController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(id): Path<Uuid>,
        payload: Result<Json<PublishRequest>, JsonRejection>,
    ) -> AppResult<Json<StatusEnvelope<BootCast>>> {
        let Json(request) = payload?;
        let cast = controller
            .bootcast_service
            .set_published(&auth_user.uid, id, request.published)
            .await?;
        Ok(Json(StatusEnvelope::success(cast)))
    }

    /// DELETE /podcasts/{id} - Soft delete
    pub async fn delete(
        State(controller): State<Arc<PodcastsController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .bootcast_service
            .soft_delete(&auth_user.uid, id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
