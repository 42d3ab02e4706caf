pub mod error;
pub mod model;
pub mod service;

pub use error::BootCastError;
pub use model::{BootCast, NewBootCast};
pub use service::{BootCastService, BootCastServiceApi};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Query of GET /podcasts
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerQuery {
    pub uid: Option<String>,
}

/// Query of GET /explore
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// One page of published casts
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorePage {
    pub items: Vec<BootCast>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Body of PATCH /podcasts/:id/publish
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}
