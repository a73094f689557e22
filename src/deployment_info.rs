// ABOUTME: Durable record of cross-resource identifiers kept in the managed bucket.
// ABOUTME: Read-modify-write store; a missing object reads as the empty record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::{ObjectStore, ObjectStoreError};
use crate::types::{GatewayResourceId, RestApiId};

/// Object key of the record inside the managed bucket.
pub const DEPLOYMENT_INFO_KEY: &str = "deploymentinfo.json";

/// Trust grant captured from one Snowflake account's API integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowflakeTrust {
    pub account: String,
    pub external_id: String,
    pub user_arn: String,
}

/// Identifiers recorded by earlier install runs.
///
/// Every field defaults to empty, so a record written by an older version (or
/// no record at all) means "nothing recorded yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentInfo {
    pub lambda_role_name: String,
    pub snowflake_role_name: String,
    pub policy_arn: String,
    pub gateway_id: String,
    pub gateway_parent_resource_id: String,
    pub gateway_endpoint_url: String,
    /// External id of the most recently configured integration.
    pub snowflake_external_id: String,
    /// IAM user ARN of the most recently configured integration.
    pub snowflake_user_arn: String,
    pub snowflake_trust: Vec<SnowflakeTrust>,
    pub function_arns: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: String,
}

impl DeploymentInfo {
    pub fn gateway_id(&self) -> Option<RestApiId> {
        non_empty(&self.gateway_id).map(RestApiId::new)
    }

    pub fn gateway_parent_resource_id(&self) -> Option<GatewayResourceId> {
        non_empty(&self.gateway_parent_resource_id).map(GatewayResourceId::new)
    }

    pub fn gateway_endpoint_url(&self) -> Option<&str> {
        non_empty(&self.gateway_endpoint_url)
    }

    pub fn policy_arn(&self) -> Option<&str> {
        non_empty(&self.policy_arn)
    }

    /// Recorded Lambda role name, or `default` when none was recorded.
    pub fn lambda_role_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.lambda_role_name).unwrap_or(default)
    }

    /// Recorded Snowflake role name, or `default` when none was recorded.
    pub fn snowflake_role_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.snowflake_role_name).unwrap_or(default)
    }

    /// Record the trust grant for `account`, replacing an earlier one.
    pub fn upsert_trust(&mut self, trust: SnowflakeTrust) {
        self.snowflake_external_id = trust.external_id.clone();
        self.snowflake_user_arn = trust.user_arn.clone();
        match self
            .snowflake_trust
            .iter_mut()
            .find(|t| t.account == trust.account)
        {
            Some(existing) => *existing = trust,
            None => self.snowflake_trust.push(trust),
        }
    }

    /// Record a function ARN once.
    pub fn record_function_arn(&mut self, arn: String) {
        if !self.function_arns.contains(&arn) {
            self.function_arns.push(arn);
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Errors from reading or writing the deployment record.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentInfoError {
    #[error("failed to read deploymentinfo.json: {0}")]
    Read(#[source] ObjectStoreError),

    #[error("failed to write deploymentinfo.json: {0}")]
    Write(#[source] ObjectStoreError),

    #[error("deploymentinfo.json is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode deployment info: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Reads and writes [`DeploymentInfo`] in one bucket.
///
/// Updates are read-modify-write without any concurrency token: two
/// installers running against the same bucket can overwrite each other's
/// changes. Only one installer per bucket is expected at a time.
pub struct DeploymentInfoStore<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    bucket: &'a str,
}

impl<'a, S: ObjectStore + ?Sized> DeploymentInfoStore<'a, S> {
    pub fn new(store: &'a S, bucket: &'a str) -> Self {
        Self { store, bucket }
    }

    /// Current record, or the empty default when none was ever written.
    pub async fn read(&self) -> Result<DeploymentInfo, DeploymentInfoError> {
        match self.store.get_object(self.bucket, DEPLOYMENT_INFO_KEY).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(DeploymentInfoError::Decode),
            Err(ObjectStoreError::NoSuchKey(_)) => {
                tracing::debug!(bucket = self.bucket, "no deployment info recorded yet");
                Ok(DeploymentInfo::default())
            }
            Err(e) => Err(DeploymentInfoError::Read(e)),
        }
    }

    /// Store `info` exactly as given.
    pub async fn write(&self, info: &DeploymentInfo) -> Result<(), DeploymentInfoError> {
        let body = serde_json::to_vec_pretty(info).map_err(DeploymentInfoError::Encode)?;
        self.store
            .put_object(self.bucket, DEPLOYMENT_INFO_KEY, body)
            .await
            .map_err(DeploymentInfoError::Write)
    }

    /// Read the record, apply `change`, stamp it, and write it back.
    pub async fn update<F>(&self, change: F) -> Result<DeploymentInfo, DeploymentInfoError>
    where
        F: FnOnce(&mut DeploymentInfo),
    {
        let mut info = self.read().await?;
        change(&mut info);
        info.updated_at = Some(Utc::now());
        info.updated_by = gethostname::gethostname().to_string_lossy().into_owned();
        self.write(&info).await?;
        tracing::debug!(bucket = self.bucket, "deployment info updated");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_object_is_default() {
        let info: DeploymentInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info, DeploymentInfo::default());
        assert!(info.gateway_id().is_none());
        assert!(info.policy_arn().is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let info: DeploymentInfo =
            serde_json::from_str(r#"{"gateway_id":"abc","legacy_field":42}"#).unwrap();
        assert_eq!(info.gateway_id(), Some(RestApiId::new("abc")));
    }

    #[test]
    fn role_names_fall_back_to_default() {
        let mut info = DeploymentInfo::default();
        assert_eq!(info.lambda_role_or("fallback"), "fallback");
        info.lambda_role_name = "custom".into();
        assert_eq!(info.lambda_role_or("fallback"), "custom");
    }

    #[test]
    fn upsert_trust_replaces_same_account() {
        let mut info = DeploymentInfo::default();
        info.upsert_trust(SnowflakeTrust {
            account: "a1".into(),
            external_id: "old".into(),
            user_arn: "arn1".into(),
        });
        info.upsert_trust(SnowflakeTrust {
            account: "a2".into(),
            external_id: "other".into(),
            user_arn: "arn2".into(),
        });
        info.upsert_trust(SnowflakeTrust {
            account: "a1".into(),
            external_id: "new".into(),
            user_arn: "arn1".into(),
        });
        assert_eq!(info.snowflake_trust.len(), 2);
        assert_eq!(info.snowflake_trust[0].external_id, "new");
        assert_eq!(info.snowflake_external_id, "new");
    }
}
