// ABOUTME: Bucket stage: create the managed bucket if absent, then seed credentials.
// ABOUTME: The credential file is uploaded on every pass through this stage.

use snafu::ResultExt;

use super::error::{BucketSnafu, BucketUnusableSnafu, CredentialsSnafu, InstallError, SeedEncodeSnafu};
use super::Run;
use crate::config::{CREDENTIALS_KEY, credentials_seed};
use crate::diagnostics::Warning;
use crate::probe::probe_bucket;
use crate::provider::{CloudOps, ObjectStoreError, SqlOps};
use crate::status::StatusResult;

impl<C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'_, C, Q> {
    pub(super) async fn ensure_bucket(&mut self) -> Result<(), InstallError> {
        let bucket = self.config.aws.bucket.as_str();

        // The snapshot may be stale; look again before creating anything.
        let probe = probe_bucket(self.cloud, bucket).await;
        match probe.bucket {
            StatusResult::Success => {
                self.output.progress("   Bucket already exists");
            }
            StatusResult::Missing(_) => {
                self.output.progress("   Creating bucket...");
                tracing::info!(bucket, zone = self.zone(), "creating bucket");
                match self.cloud.create_bucket(bucket, self.zone()).await {
                    Ok(()) => {}
                    Err(ObjectStoreError::BucketAlreadyExists(msg)) => {
                        self.report
                            .diagnostics
                            .warn(Warning::already_exists(format!("bucket {bucket}: {msg}")));
                    }
                    Err(source) => {
                        return Err(source).context(BucketSnafu { bucket });
                    }
                }
            }
            other => {
                let reason = [&probe.connection, &probe.credentials, &other]
                    .into_iter()
                    .find_map(|r| r.cause())
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "bucket state could not be verified".to_string());
                return BucketUnusableSnafu { bucket, reason }.fail();
            }
        }

        self.output.progress("   Uploading credential file...");
        let seed = credentials_seed(&self.config.venafi).context(SeedEncodeSnafu)?;
        tracing::info!(bucket, key = CREDENTIALS_KEY, records = self.config.venafi.len(), "uploading credential seed");
        self.cloud
            .put_object(bucket, CREDENTIALS_KEY, seed)
            .await
            .context(CredentialsSnafu)?;
        Ok(())
    }
}
