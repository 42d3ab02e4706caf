use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum EntitlementError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("user not found")]
    NotFound,
}

impl From<EntitlementError> for AppError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::Invalid(msg) => AppError::BadRequest(msg),
            EntitlementError::NotFound => AppError::NotFound("User not found".to_string()),
            EntitlementError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
