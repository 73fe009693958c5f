//! Object storage upload step.

pub mod s3;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::core::models::{ObjectLocation, UploadAck, UploadRequest};
use crate::errors::StorageError;

pub use s3::S3ObjectStore;

/// Key-addressed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates or overwrites `bucket/key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Writes local files into an [`ObjectStore`]. Failures are returned as-is;
/// retrying is left to the caller.
pub struct Uploader<S> {
    store: S,
}

impl<S: ObjectStore> Uploader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    ///
    /// Returns an error if the request names an empty bucket or object, the
    /// local file cannot be read, or the store rejects the write.
    #[instrument(level = "info", skip(self), fields(bucket = %request.bucket, object = %request.object_name))]
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, StorageError> {
        if request.bucket.trim().is_empty() {
            return Err(StorageError::InvalidRequest(
                "bucket must not be empty".to_string(),
            ));
        }
        if request.object_name.trim().is_empty() {
            return Err(StorageError::InvalidRequest(
                "object name must not be empty".to_string(),
            ));
        }

        let body = tokio::fs::read(&request.local_path)
            .await
            .map_err(|e| {
                error!("Failed to read {}: {}", request.local_path.display(), e);
                StorageError::LocalFile {
                    path: request.local_path.display().to_string(),
                    reason: e.kind().to_string(),
                }
            })?;
        let size = body.len();
        let content_type = mime_guess::from_path(&request.object_name).first_or_octet_stream();

        self.store
            .put_object(
                &request.bucket,
                &request.object_name,
                body,
                content_type.essence_str(),
            )
            .await?;

        info!(
            "Uploaded {} bytes ({}) to s3://{}/{}",
            size, content_type, request.bucket, request.object_name
        );

        Ok(UploadAck {
            location: ObjectLocation::new(&request.bucket, &request.object_name),
        })
    }
}
