use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::domain::entitlement::{
    EmailQuery, EntitlementTracker, EntitlementTrackerApi, NewUserRequest, UserEntitlement,
};
use crate::error::AppResult;

pub struct EntitlementController {
    entitlement_tracker: Arc<EntitlementTracker>,
}

impl EntitlementController {
    pub fn new(entitlement_tracker: Arc<EntitlementTracker>) -> Self {
        Self {
            entitlement_tracker,
        }
    }

    /// GET /newUser?email= - Entitlement of a user, or null
    pub async fn find(
        State(controller): State<Arc<EntitlementController>>,
        Query(query): Query<EmailQuery>,
    ) -> AppResult<Json<Option<UserEntitlement>>> {
        let entitlement = controller
            .entitlement_tracker
            .find(query.email.as_deref().unwrap_or_default())
            .await?;
        Ok(Json(entitlement))
    }

    /// POST /newUser - Register a user on the base plan
    pub async fn register(
        State(controller): State<Arc<EntitlementController>>,
        payload: Result<Json<NewUserRequest>, JsonRejection>,
    ) -> AppResult<Json<UserEntitlement>> {
        let Json(request) = payload?;
        let entitlement = controller
            .entitlement_tracker
            .get_or_create(request.email.as_deref().unwrap_or_default())
            .await?;
        Ok(Json(entitlement))
    }
}
