pub mod error;
pub mod model;
pub mod plan_catalog;
pub mod service;

pub use error::EntitlementError;
pub use model::{Eligibility, Plan, UserEntitlement, DEFAULT_ALLOWED_CASTS, QUOTA_USED_MESSAGE};
pub use plan_catalog::{PlanCatalog, PlanTier};
pub use service::{EntitlementTracker, EntitlementTrackerApi};

use serde::{Deserialize, Serialize};

/// Body of POST /newUser
#[derive(Debug, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub email: Option<String>,
}

/// Query of GET /newUser
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}
