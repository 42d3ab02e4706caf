use super::error::PaymentError;
use super::webhook::{
    verify_signature, CheckoutSession, WebhookEvent, CHECKOUT_COMPLETED,
    SIGNATURE_TOLERANCE_SECS, SUBSCRIPTION_DELETED,
};
use crate::domain::entitlement::{
    EntitlementError, EntitlementTracker, EntitlementTrackerApi, Plan, PlanCatalog,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// What a webhook delivery changed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum WebhookOutcome {
    #[serde(rename_all = "camelCase")]
    PlanChanged {
        email: String,
        plan: Plan,
        allowed_casts: i32,
    },
    /// Paid an amount no tier matches; the gate opens, the plan stays
    #[serde(rename_all = "camelCase")]
    GateReopened { email: String, amount: i64 },
    #[serde(rename_all = "camelCase")]
    Ignored { event_type: String, reason: String },
}

pub struct PaymentService {
    entitlement_tracker: Arc<EntitlementTracker>,
    plan_catalog: PlanCatalog,
    webhook_secret: String,
}

impl PaymentService {
    pub fn new(
        entitlement_tracker: Arc<EntitlementTracker>,
        plan_catalog: PlanCatalog,
        webhook_secret: String,
    ) -> Self {
        Self {
            entitlement_tracker,
            plan_catalog,
            webhook_secret,
        }
    }
}

#[async_trait]
pub trait PaymentServiceApi: Send + Sync {
    /// Verify and apply one webhook delivery
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, PaymentError>;
}

#[async_trait]
impl PaymentServiceApi for PaymentService {
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, PaymentError> {
        let signature = signature
            .ok_or_else(|| PaymentError::InvalidSignature("missing signature header".to_string()))?;
        verify_signature(
            payload,
            signature,
            &self.webhook_secret,
            Utc::now().timestamp(),
            SIGNATURE_TOLERANCE_SECS,
        )?;

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::Invalid(e.to_string()))?;

        tracing::info!(
            event_id = event.id.as_deref().unwrap_or("unknown"),
            event_type = %event.event_type,
            "Payment webhook received"
        );

        match event.event_type.as_str() {
            CHECKOUT_COMPLETED => self.apply_checkout(event).await,
            SUBSCRIPTION_DELETED => {
                tracing::info!(
                    subscription = event.data.object.get("id").and_then(|v| v.as_str()).unwrap_or("unknown"),
                    "Subscription cancelled; plan kept until manual review"
                );
                Ok(WebhookOutcome::Ignored {
                    event_type: event.event_type,
                    reason: "subscription cancellation is not applied automatically".to_string(),
                })
            }
            _ => {
                tracing::debug!(event_type = %event.event_type, "Unhandled webhook event");
                Ok(WebhookOutcome::Ignored {
                    event_type: event.event_type,
                    reason: "unhandled event type".to_string(),
                })
            }
        }
    }
}

impl PaymentService {
    async fn apply_checkout(&self, event: WebhookEvent) -> Result<WebhookOutcome, PaymentError> {
        let session: CheckoutSession = serde_json::from_value(event.data.object)
            .map_err(|e| PaymentError::Invalid(e.to_string()))?;

        let email = session
            .customer_details
            .and_then(|c| c.email)
            .ok_or_else(|| PaymentError::Invalid("checkout session has no customer email".to_string()))?;
        let amount = session
            .amount_subtotal
            .ok_or_else(|| PaymentError::Invalid("checkout session has no amount".to_string()))?;

        let tier = match self.plan_catalog.tier_for_amount(amount) {
            Some(tier) => tier.clone(),
            None => {
                tracing::warn!(
                    email = %email,
                    amount,
                    "Checkout amount matches no plan; reopening gate without plan change"
                );
                let updated = self
                    .entitlement_tracker
                    .reopen_gate(&email)
                    .await
                    .map_err(map_entitlement_error)?;
                return Ok(WebhookOutcome::GateReopened {
                    email: updated.email,
                    amount,
                });
            }
        };

        let updated = self
            .entitlement_tracker
            .apply_plan_change(&email, tier.plan, tier.allowed_casts)
            .await
            .map_err(map_entitlement_error)?;

        Ok(WebhookOutcome::PlanChanged {
            email: updated.email,
            plan: updated.plan,
            allowed_casts: updated.allowed_casts,
        })
    }
}

fn map_entitlement_error(err: EntitlementError) -> PaymentError {
    match err {
        EntitlementError::NotFound => PaymentError::UserNotFound,
        EntitlementError::Invalid(msg) => PaymentError::Invalid(msg),
        EntitlementError::Dependency(msg) => PaymentError::Dependency(msg),
    }
}
