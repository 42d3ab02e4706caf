use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A generated two-speaker conversation and where its audio lives
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BootCast {
    pub id: Uuid,
    pub uid: String,
    pub bootcast_name: String,
    pub name1: String,
    pub name2: String,
    pub characters: Vec<String>,
    pub content: String,
    pub link: String,
    pub is_deleted: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a BootCast; flags start cleared
#[derive(Debug, Clone)]
pub struct NewBootCast {
    pub uid: String,
    pub bootcast_name: String,
    pub name1: String,
    pub name2: String,
    pub characters: [String; 2],
    pub content: String,
    pub link: String,
}
