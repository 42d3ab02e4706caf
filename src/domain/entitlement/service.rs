use super::error::EntitlementError;
use super::model::{Eligibility, Plan, UserEntitlement};
use crate::infrastructure::repositories::EntitlementRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct EntitlementTracker {
    entitlement_repo: Arc<dyn EntitlementRepository>,
}

impl EntitlementTracker {
    pub fn new(entitlement_repo: Arc<dyn EntitlementRepository>) -> Self {
        Self { entitlement_repo }
    }
}

#[async_trait]
pub trait EntitlementTrackerApi: Send + Sync {
    /// Return the user's record, creating a base-plan one on first sight
    async fn get_or_create(&self, email: &str) -> Result<UserEntitlement, EntitlementError>;

    async fn find(&self, email: &str) -> Result<Option<UserEntitlement>, EntitlementError>;

    /// Whether the user may start a new compilation
    async fn check_eligibility(&self, email: &str) -> Result<Eligibility, EntitlementError>;

    /// Reserve one cast before any provider work, closing the gate once the
    /// quota is used up. `None` when the gate is closed or the quota is spent.
    async fn claim_compilation(
        &self,
        email: &str,
    ) -> Result<Option<UserEntitlement>, EntitlementError>;

    /// Return a cast reserved by a compilation that did not finish
    async fn release_compilation(&self, email: &str) -> Result<(), EntitlementError>;

    /// Reopen the gate for an existing user, keeping plan and counters
    async fn reopen_gate(&self, email: &str) -> Result<UserEntitlement, EntitlementError>;

    /// Move the user to a plan and reopen the gate
    async fn apply_plan_change(
        &self,
        email: &str,
        plan: Plan,
        allowed_casts: i32,
    ) -> Result<UserEntitlement, EntitlementError>;
}

#[async_trait]
impl EntitlementTrackerApi for EntitlementTracker {
    async fn get_or_create(&self, email: &str) -> Result<UserEntitlement, EntitlementError> {
        let email = normalize_email(email)?;

        let entitlement = self
            .entitlement_repo
            .find_or_insert(&email)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))?;

        tracing::debug!(
            email = %entitlement.email,
            plan = %entitlement.plan,
            used_casts = entitlement.used_casts,
            allowed_casts = entitlement.allowed_casts,
            "Entitlement resolved"
        );

        Ok(entitlement)
    }

    async fn find(&self, email: &str) -> Result<Option<UserEntitlement>, EntitlementError> {
        let email = normalize_email(email)?;
        self.entitlement_repo
            .find_by_email(&email)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))
    }

    async fn check_eligibility(&self, email: &str) -> Result<Eligibility, EntitlementError> {
        let entitlement = self.find(email).await?.ok_or(EntitlementError::NotFound)?;
        Ok(entitlement.eligibility())
    }

    async fn claim_compilation(
        &self,
        email: &str,
    ) -> Result<Option<UserEntitlement>, EntitlementError> {
        let email = normalize_email(email)?;

        let claimed = self
            .entitlement_repo
            .claim_cast(&email)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))?;

        match &claimed {
            Some(updated) => tracing::info!(
                email = %updated.email,
                used_casts = updated.used_casts,
                allowed_casts = updated.allowed_casts,
                can_compile = updated.can_compile,
                "Compilation claimed"
            ),
            None => tracing::info!(email = %email, "Compilation claim refused"),
        }

        Ok(claimed)
    }

    async fn release_compilation(&self, email: &str) -> Result<(), EntitlementError> {
        let email = normalize_email(email)?;

        let released = self
            .entitlement_repo
            .release_cast(&email)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))?;

        match released {
            Some(updated) => tracing::info!(
                email = %updated.email,
                used_casts = updated.used_casts,
                "Compilation claim released"
            ),
            None => tracing::warn!(email = %email, "No claimed cast to release"),
        }

        Ok(())
    }

    async fn reopen_gate(&self, email: &str) -> Result<UserEntitlement, EntitlementError> {
        let email = normalize_email(email)?;

        let updated = self
            .entitlement_repo
            .reopen_gate(&email)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))?
            .ok_or(EntitlementError::NotFound)?;

        tracing::info!(
            email = %updated.email,
            plan = %updated.plan,
            used_casts = updated.used_casts,
            "Compilation gate reopened"
        );

        Ok(updated)
    }

    async fn apply_plan_change(
        &self,
        email: &str,
        plan: Plan,
        allowed_casts: i32,
    ) -> Result<UserEntitlement, EntitlementError> {
        let email = normalize_email(email)?;
        if allowed_casts <= 0 {
            return Err(EntitlementError::Invalid(
                "allowed casts must be positive".to_string(),
            ));
        }

        let updated = self
            .entitlement_repo
            .update_plan(&email, plan, allowed_casts)
            .await
            .map_err(|e| EntitlementError::Dependency(e.to_string()))?
            .ok_or(EntitlementError::NotFound)?;

        tracing::info!(
            email = %updated.email,
            plan = %updated.plan,
            allowed_casts = updated.allowed_casts,
            "Plan changed"
        );

        Ok(updated)
    }
}

pub(crate) fn normalize_email(email: &str) -> Result<String, EntitlementError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(EntitlementError::Invalid("Email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(EntitlementError::Invalid(format!("Invalid email: {}", email)));
    }
    Ok(email)
}
