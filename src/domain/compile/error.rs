use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0}")]
    Denied(String),
    #[error("no API key available")]
    NoKeyAvailable,
    #[error("provider error: {0}")]
    Provider(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Invalid(msg) => AppError::BadRequest(msg),
            CompileError::Denied(msg) => AppError::BadRequest(msg),
            CompileError::NoKeyAvailable => AppError::ServiceUnavailable(
                "No API key available, try again later".to_string(),
            ),
            CompileError::Provider(msg) => AppError::ExternalService(msg),
            CompileError::Storage(msg) => AppError::Storage(msg),
            CompileError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
