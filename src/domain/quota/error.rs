use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("key does not exist")]
    NotFound,
    #[error("key usage limit reached")]
    Exhausted,
    #[error("key already exists")]
    AlreadyExists,
}

impl From<QuotaError> for AppError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::Invalid(msg) => AppError::BadRequest(msg),
            QuotaError::NotFound => AppError::NotFound("Key does not exist".to_string()),
            QuotaError::Exhausted => AppError::Conflict("Key usage limit reached".to_string()),
            QuotaError::AlreadyExists => AppError::BadRequest("Key already exists".to_string()),
            QuotaError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
