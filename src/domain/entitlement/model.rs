use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_ALLOWED_CASTS: i32 = 3;

pub const QUOTA_USED_MESSAGE: &str = "you have used all your bootcasts";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum Plan {
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "pro")]
    Pro,
    #[serde(rename = "enterprise")]
    Enterprise,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Base => write!(f, "base"),
            Plan::Pro => write!(f, "pro"),
            Plan::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Subscription tier and compilation quota of one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserEntitlement {
    pub id: Uuid,
    pub email: String,
    pub plan: Plan,
    pub allowed_casts: i32,
    pub used_casts: i32,
    pub can_compile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied(String),
}

impl Eligibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed)
    }
}

impl UserEntitlement {
    pub fn eligibility(&self) -> Eligibility {
        evaluate(self.used_casts, self.allowed_casts, self.can_compile)
    }

    pub fn remaining_casts(&self) -> i32 {
        (self.allowed_casts - self.used_casts).max(0)
    }
}

/// A user may compile only while the gate is open and quota remains
pub fn evaluate(used_casts: i32, allowed_casts: i32, can_compile: bool) -> Eligibility {
    if !can_compile || used_casts >= allowed_casts {
        return Eligibility::Denied(QUOTA_USED_MESSAGE.to_string());
    }
    Eligibility::Allowed
}
