use super::{validate_file_name, AudioStorage, StorageError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Audio files on local disk, served by the HTTP layer under `/audio`
pub struct LocalAudioStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAudioStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_link(&self, name: &str) -> String {
        format!("{}/audio/{}", self.public_base_url, urlencoding::encode(name))
    }
}

#[async_trait]
impl AudioStorage for LocalAudioStorage {
    async fn put(&self, bytes: Vec<u8>, name: &str, content_type: &str) -> Result<String, StorageError> {
        let name = validate_file_name(name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to create audio dir: {}", e)))?;

        let path = self.root.join(name);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
                _ => StorageError::Backend(format!("Failed to create {}: {}", name, e)),
            })?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to write {}: {}", name, e)))?;
        file.flush()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to write {}: {}", name, e)))?;

        tracing::info!(
            file_name = name,
            bytes = bytes.len(),
            content_type = content_type,
            "Audio stored on local disk"
        );

        Ok(self.public_link(name))
    }

    async fn signed_url(&self, name: &str, _ttl_secs: u64) -> Result<String, StorageError> {
        let name = validate_file_name(name)?;

        let exists = tokio::fs::try_exists(self.root.join(name))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if !exists {
            return Err(StorageError::NotFound(name.to_string()));
        }

        // Local files are public; the link doubles as the download URL
        Ok(self.public_link(name))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let name = validate_file_name(name)?;

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Backend(format!("Failed to delete {}: {}", name, e))),
        }
    }
}
