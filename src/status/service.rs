// ABOUTME: Full health snapshot of the deployment, rebuilt on every run.
// ABOUTME: Holds AWS resource verdicts and per-Snowflake-account details.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::StatusResult;
use crate::types::ConnectorFunction;

/// One result per connector function, indexed by [`ConnectorFunction`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionStatuses([StatusResult; 6]);

impl FunctionStatuses {
    pub fn get(&self, function: ConnectorFunction) -> &StatusResult {
        &self.0[function.index()]
    }

    pub fn set(&mut self, function: ConnectorFunction, result: StatusResult) {
        self.0[function.index()] = result;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectorFunction, &StatusResult)> {
        ConnectorFunction::ALL.into_iter().zip(self.0.iter())
    }

    pub fn results(&self) -> impl Iterator<Item = &StatusResult> {
        self.0.iter()
    }
}

impl Serialize for FunctionStatuses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (function, result) in self.iter() {
            map.serialize_entry(function.label(), result)?;
        }
        map.end()
    }
}

/// Connection and function verdicts for one configured Snowflake account.
#[derive(Debug, Clone, Serialize)]
pub struct SnowflakeAccountStatus {
    pub account: String,
    pub database: String,
    pub warehouse: String,
    pub schema: String,
    pub username: String,
    pub role: String,
    pub connection: StatusResult,
    pub functions: FunctionStatuses,
    pub health: StatusResult,
}

/// Snapshot produced by one status check.
///
/// Fields are populated top-down; anything after a short-circuit point stays
/// [`StatusResult::NotChecked`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceStatus {
    pub aws_connection: StatusResult,
    pub aws_credentials: StatusResult,
    pub aws_bucket: StatusResult,
    pub credentials_file: StatusResult,
    pub deployment_info_read: StatusResult,
    pub lambda_role: StatusResult,
    pub snowflake_role: StatusResult,
    pub lambda_policy: StatusResult,
    pub aws_lambdas: StatusResult,
    pub lambda_details: FunctionStatuses,
    pub aws_gateway: StatusResult,
    /// Every function has its resource and method on the recorded REST API.
    pub gateway_integrations: StatusResult,
    pub snowflake_health: StatusResult,
    pub snowflake_accounts: Vec<SnowflakeAccountStatus>,
}

impl ServiceStatus {
    /// Connection and credentials both verified.
    pub fn aws_reachable(&self) -> bool {
        self.aws_connection.is_success() && self.aws_credentials.is_success()
    }

    /// Bucket exists and holds the credential seed file.
    pub fn bucket_ready(&self) -> bool {
        self.aws_bucket.is_success() && self.credentials_file.is_success()
    }

    /// True when the aggregator stopped before reaching the IAM checks.
    pub fn short_circuited(&self) -> bool {
        self.deployment_info_read.is_not_checked()
    }

    /// Every category verified healthy.
    pub fn fully_deployed(&self) -> bool {
        self.aws_reachable()
            && self.bucket_ready()
            && self.deployment_info_read.is_success()
            && self.lambda_role.is_success()
            && self.snowflake_role.is_success()
            && self.lambda_policy.is_success()
            && self.aws_lambdas.is_success()
            && self.aws_gateway.is_success()
            && self.gateway_integrations.is_success()
            && self.snowflake_health.is_success()
    }
}
