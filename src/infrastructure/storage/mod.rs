pub mod local;
pub mod s3;

pub use local::LocalAudioStorage;
pub use s3::S3AudioStorage;

use crate::error::AppError;
use async_trait::async_trait;

/// Lifetime of download links handed out by POST /download
pub const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid file name: {0}")]
    InvalidName(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(msg) => AppError::BadRequest(format!("Invalid file name: {}", msg)),
            StorageError::NotFound(name) => AppError::NotFound(format!("File {} not found", name)),
            StorageError::AlreadyExists(name) => AppError::Conflict(format!("File {} already exists", name)),
            StorageError::Backend(msg) => AppError::Storage(msg),
        }
    }
}

/// Where compiled audio lives and how clients reach it
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Persist a new file and return its long-lived link. Never overwrites:
    /// an existing name yields `AlreadyExists`.
    async fn put(&self, bytes: Vec<u8>, name: &str, content_type: &str) -> Result<String, StorageError>;

    /// Time-limited download link for a stored file
    async fn signed_url(&self, name: &str, ttl_secs: u64) -> Result<String, StorageError>;

    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}

/// Only flat `.wav` names made of word characters and dashes are accepted
pub fn validate_file_name(name: &str) -> Result<&str, StorageError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StorageError::InvalidName("file name is required".to_string()));
    }
    let valid = name
        .strip_suffix(".wav")
        .filter(|stem| !stem.is_empty())
        .map(|stem| {
            stem.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
        .unwrap_or(false);
    if !valid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(name)
}
