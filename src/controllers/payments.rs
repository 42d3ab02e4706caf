use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::payment::{
    webhook::SIGNATURE_HEADER, PaymentService, PaymentServiceApi, WebhookOutcome,
};
use crate::error::AppResult;

/// Acknowledgement returned to the payment provider
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: WebhookOutcome,
}

pub struct PaymentsController {
    payment_service: Arc<PaymentService>,
}

impl PaymentsController {
    pub fn new(payment_service: Arc<PaymentService>) -> Self {
        Self { payment_service }
    }

    /// POST /payments - Payment provider webhook
    pub async fn webhook(
        State(controller): State<Arc<PaymentsController>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<Json<WebhookAck>> {
        let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

        let outcome = controller
            .payment_service
            .handle_webhook(&body, signature)
            .await?;

        Ok(Json(WebhookAck {
            received: true,
            outcome,
        }))
    }
}
