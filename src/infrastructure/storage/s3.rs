use super::{validate_file_name, AudioStorage, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, primitives::ByteStream, Client as S3Client};
use std::sync::Arc;
use std::time::Duration;

/// Audio files in an S3 bucket under a fixed key prefix
pub struct S3AudioStorage {
    s3_client: Arc<S3Client>,
    bucket: String,
    region: String,
    key_prefix: String,
}

impl S3AudioStorage {
    pub fn new(s3_client: Arc<S3Client>, bucket: String, region: String, key_prefix: String) -> Self {
        Self {
            s3_client,
            bucket,
            region,
            key_prefix: key_prefix.trim_matches('/').to_string(),
        }
    }

    fn object_key(&self, name: &str) -> String {
        if self.key_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.key_prefix, name)
        }
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket,
            self.region,
            self.object_key(name)
        )
    }
}

#[async_trait]
impl AudioStorage for S3AudioStorage {
    async fn put(&self, bytes: Vec<u8>, name: &str, content_type: &str) -> Result<String, StorageError> {
        let name = validate_file_name(name)?;
        let key = self.object_key(name);
        let size = bytes.len();

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .if_none_match("*")
            .send()
            .await
            .map_err(|e| {
                // 412 means the conditional write found an object under this key
                if e.raw_response().map(|r| r.status().as_u16()) == Some(412) {
                    return StorageError::AlreadyExists(name.to_string());
                }
                tracing::error!(error = ?e, key = %key, "S3 upload failed");
                StorageError::Backend(format!("Failed to upload {}: {}", key, e))
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, bytes = size, "Audio uploaded to S3");
        Ok(self.public_url(name))
    }

    async fn signed_url(&self, name: &str, ttl_secs: u64) -> Result<String, StorageError> {
        let name = validate_file_name(name)?;
        let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
            .map_err(|e| StorageError::Backend(format!("Invalid presign duration: {}", e)))?;

        let request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(name))
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to presign {}: {}", name, e)))?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let name = validate_file_name(name)?;
        let key = self.object_key(name);

        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to delete {}: {}", key, e)))?;

        tracing::info!(bucket = %self.bucket, key = %key, "Audio deleted from S3");
        Ok(())
    }
}
