use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum BootCastError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("bootcast not found")]
    NotFound,
}

impl From<BootCastError> for AppError {
    fn from(err: BootCastError) -> Self {
        match err {
            BootCastError::Invalid(msg) => AppError::BadRequest(msg),
            BootCastError::NotFound => AppError::NotFound("BootCast not found".to_string()),
            BootCastError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
