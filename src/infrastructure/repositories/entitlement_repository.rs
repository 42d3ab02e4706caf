use crate::domain::entitlement::{Plan, UserEntitlement, DEFAULT_ALLOWED_CASTS};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntitlement>>;

    /// Existing record, or a fresh base-plan one
    async fn find_or_insert(&self, email: &str) -> AppResult<UserEntitlement>;

    /// Take one cast if the gate is open and quota remains; `None` when refused
    async fn claim_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>>;

    /// Give back a claimed cast after a failed compilation
    async fn release_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>>;

    /// Open the gate without touching the plan or counters
    async fn reopen_gate(&self, email: &str) -> AppResult<Option<UserEntitlement>>;

    async fn update_plan(
        &self,
        email: &str,
        plan: Plan,
        allowed_casts: i32,
    ) -> AppResult<Option<UserEntitlement>>;
}

pub struct PostgresEntitlementRepository {
    pool: Arc<DbPool>,
}

impl PostgresEntitlementRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementRepository for PostgresEntitlementRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let pool = self.pool.as_ref();

        let entitlement = sqlx::query_as::<_, UserEntitlement>(
            r#"
            SELECT id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            FROM entitlements
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(entitlement)
    }

    async fn find_or_insert(&self, email: &str) -> AppResult<UserEntitlement> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        // The no-op update makes RETURNING yield the existing row on conflict
        let entitlement = sqlx::query_as::<_, UserEntitlement>(
            r#"
            INSERT INTO entitlements (id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, TRUE, $5, $5)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(Plan::Base)
        .bind(DEFAULT_ALLOWED_CASTS)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(entitlement)
    }

    async fn claim_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let pool = self.pool.as_ref();

        // Check and increment in one statement so concurrent claims cannot overshoot
        let claimed = sqlx::query_as::<_, UserEntitlement>(
            r#"
            UPDATE entitlements
            SET used_casts = used_casts + 1,
                can_compile = (used_casts + 1 < allowed_casts),
                updated_at = $2
            WHERE email = $1 AND can_compile AND used_casts < allowed_casts
            RETURNING id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(claimed)
    }

    async fn release_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let pool = self.pool.as_ref();

        let released = sqlx::query_as::<_, UserEntitlement>(
            r#"
            UPDATE entitlements
            SET used_casts = used_casts - 1,
                can_compile = (used_casts - 1 < allowed_casts),
                updated_at = $2
            WHERE email = $1 AND used_casts > 0
            RETURNING id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(released)
    }

    async fn reopen_gate(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let pool = self.pool.as_ref();

        let updated = sqlx::query_as::<_, UserEntitlement>(
            r#"
            UPDATE entitlements
            SET can_compile = TRUE, updated_at = $2
            WHERE email = $1
            RETURNING id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    async fn update_plan(
        &self,
        email: &str,
        plan: Plan,
        allowed_casts: i32,
    ) -> AppResult<Option<UserEntitlement>> {
        let pool = self.pool.as_ref();

        let updated = sqlx::query_as::<_, UserEntitlement>(
            r#"
            UPDATE entitlements
            SET plan = $2, allowed_casts = $3, can_compile = TRUE, updated_at = $4
            WHERE email = $1
            RETURNING id, email, plan, allowed_casts, used_casts, can_compile, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(plan)
        .bind(allowed_casts)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }
}
