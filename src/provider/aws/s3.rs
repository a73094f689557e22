// ABOUTME: ObjectStore implementation on the S3 SDK client.
// ABOUTME: Maps S3 error codes onto not-found, credential, and conflict flavors.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use super::{AwsClients, describe};
use crate::provider::traits::{ObjectStore, ObjectStoreError};

/// Error codes S3 returns when the access key or signature is bad.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "InvalidToken",
    "ExpiredToken",
];

// us-east-1 rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn credential_failure<E: ProvideErrorMetadata>(err: &E) -> bool {
    err.code()
        .is_some_and(|code| CREDENTIAL_ERROR_CODES.contains(&code))
}

fn map_list_error<E, R>(err: SdkError<E, R>, bucket: &str) -> ObjectStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.code() == Some("NoSuchBucket") {
        ObjectStoreError::NoSuchBucket(bucket.to_string())
    } else if credential_failure(&err) {
        ObjectStoreError::InvalidCredentials(describe(err))
    } else {
        ObjectStoreError::Provider(describe(err))
    }
}

fn map_object_error<E, R>(err: SdkError<E, R>, bucket: &str, key: &str) -> ObjectStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        // HEAD responses carry no body, so a missing key surfaces as NotFound.
        Some("NoSuchKey") | Some("NotFound") => {
            ObjectStoreError::NoSuchKey(format!("{bucket}/{key}"))
        }
        Some("NoSuchBucket") => ObjectStoreError::NoSuchBucket(bucket.to_string()),
        _ if credential_failure(&err) => ObjectStoreError::InvalidCredentials(describe(err)),
        _ => ObjectStoreError::Provider(describe(err)),
    }
}

// =============================================================================
// ObjectStore
// =============================================================================

#[async_trait]
impl ObjectStore for AwsClients {
    async fn list_objects(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        self.s3
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(2)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_list_error(e, bucket))
    }

    async fn create_bucket(&self, bucket: &str, zone: &str) -> Result<(), ObjectStoreError> {
        let mut request = self.s3.create_bucket().bucket(bucket);
        if zone != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(zone))
                    .build(),
            );
        }
        match request.send().await {
            Ok(_) => Ok(()),
            Err(e)
                if matches!(
                    e.code(),
                    Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou")
                ) =>
            {
                Err(ObjectStoreError::BucketAlreadyExists(describe(e)))
            }
            Err(e) => Err(map_list_error(e, bucket)),
        }
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.s3
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_object_error(e, bucket, key))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let output = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_object_error(e, bucket, key))?;
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Provider(format!("reading {bucket}/{key}: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ObjectStoreError> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_object_error(e, bucket, key))
    }
}
