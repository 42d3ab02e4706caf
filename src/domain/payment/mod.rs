pub mod error;
pub mod service;
pub mod webhook;

pub use error::PaymentError;
pub use service::{PaymentService, PaymentServiceApi, WebhookOutcome};
