use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid webhook signature: {0}")]
    InvalidSignature(String),
    #[error("invalid webhook payload: {0}")]
    Invalid(String),
    #[error("user not found")]
    UserNotFound,
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidSignature(msg) => {
                AppError::BadRequest(format!("Invalid webhook signature: {}", msg))
            }
            PaymentError::Invalid(msg) => AppError::BadRequest(msg),
            PaymentError::UserNotFound => AppError::NotFound("User not found".to_string()),
            PaymentError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
