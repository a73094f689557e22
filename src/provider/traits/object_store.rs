// ABOUTME: Object storage operations trait (S3-like).
// ABOUTME: Bucket listing and creation, object head/get/put.

use async_trait::async_trait;

/// Bucket and object operations used by probes, the installer, and the
/// deployment info store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List at most a couple of keys. Serves as the connectivity, credential,
    /// and bucket existence check in one call.
    async fn list_objects(&self, bucket: &str) -> Result<(), ObjectStoreError>;

    /// Create a bucket in the given region.
    async fn create_bucket(&self, bucket: &str, zone: &str) -> Result<(), ObjectStoreError>;

    /// Check that an object exists without downloading it.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;

    /// Download an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Upload (or overwrite) an object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ObjectStoreError>;
}

/// Errors from object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("bucket not found: {0}")]
    NoSuchBucket(String),

    #[error("object not found: {0}")]
    NoSuchKey(String),

    #[error("credentials rejected: {0}")]
    InvalidCredentials(String),

    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),

    #[error("storage error: {0}")]
    Provider(String),
}
