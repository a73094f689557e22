// ABOUTME: Builds a ServiceStatus by running every probe in a fixed order.
// ABOUTME: Read-only; stops early when AWS or the bucket is unusable.

use crate::config::{CREDENTIALS_KEY, Config};
use crate::deployment_info::DeploymentInfoStore;
use crate::install::{DEFAULT_LAMBDA_ROLE, DEFAULT_SNOWFLAKE_ROLE, GATEWAY_METHOD};
use crate::probe;
use crate::provider::{CloudOps, SqlOps};
use crate::types::ConnectorFunction;

use super::{FunctionCheckState, FunctionStatuses, ServiceStatus, SnowflakeAccountStatus, StatusResult};

/// Probe every managed resource and return the snapshot.
///
/// Never mutates remote state. Fields after a short-circuit point are left
/// [`StatusResult::NotChecked`].
pub async fn check_status<C, Q>(config: &Config, cloud: &C, sql: &Q) -> ServiceStatus
where
    C: CloudOps + ?Sized,
    Q: SqlOps + ?Sized,
{
    let bucket = config.aws.bucket.as_str();
    let mut status = ServiceStatus::default();

    let base = probe::probe_bucket(cloud, bucket).await;
    status.aws_connection = base.connection;
    status.aws_credentials = base.credentials;
    status.aws_bucket = base.bucket;

    if status.aws_bucket.is_success() {
        status.credentials_file = match probe::probe_object(cloud, bucket, CREDENTIALS_KEY).await {
            StatusResult::Missing(_) => StatusResult::missing("credential file not found"),
            other => other,
        };
    }

    if !status.aws_reachable() || !status.aws_bucket.is_success() {
        tracing::debug!("basic AWS checks failed, skipping resource checks");
        return status;
    }

    let info = match DeploymentInfoStore::new(cloud, bucket).read().await {
        Ok(info) => {
            status.deployment_info_read = StatusResult::Success;
            info
        }
        Err(e) => {
            status.deployment_info_read = StatusResult::error(e.to_string());
            return status;
        }
    };

    status.lambda_role = probe::probe_role(cloud, info.lambda_role_or(DEFAULT_LAMBDA_ROLE)).await;
    status.snowflake_role =
        probe::probe_role(cloud, info.snowflake_role_or(DEFAULT_SNOWFLAKE_ROLE)).await;
    status.lambda_policy = match info.policy_arn() {
        Some(arn) => probe::probe_policy(cloud, arn).await,
        None => StatusResult::missing("no policy recorded in deployment info"),
    };

    let mut lambdas = FunctionCheckState::default();
    for function in ConnectorFunction::ALL {
        let result = lambdas.record(probe::probe_lambda(cloud, &function.lambda_name()).await);
        status.lambda_details.set(function, result);
    }
    status.aws_lambdas = lambdas.verdict();

    status.aws_gateway = match info.gateway_id() {
        Some(id) => probe::probe_rest_api(cloud, &id).await,
        None => StatusResult::missing("no REST API recorded in deployment info"),
    };
    if status.aws_gateway.is_success()
        && let Some(id) = info.gateway_id()
    {
        let root = info.gateway_parent_resource_id();
        status.gateway_integrations =
            probe::probe_gateway_wiring(cloud, &id, root.as_ref(), GATEWAY_METHOD).await;
    }

    let mut health = FunctionCheckState::default();
    for account in config.snowflake.iter() {
        let connection = probe::probe_sql_connection(sql, account).await;
        let mut functions = FunctionStatuses::default();

        let account_health = if connection.is_success() {
            let mut state = FunctionCheckState::default();
            for function in ConnectorFunction::ALL {
                let result = state
                    .record(probe::probe_external_function(sql, account, function).await);
                functions.set(function, result);
            }
            state.verdict()
        } else {
            connection.clone()
        };

        health.record(account_health.clone());
        status.snowflake_accounts.push(SnowflakeAccountStatus {
            account: account.account.clone(),
            database: account.database.clone(),
            warehouse: account.warehouse.clone(),
            schema: account.schema.clone(),
            username: account.username.clone(),
            role: account.role.clone(),
            connection,
            functions,
            health: account_health,
        });
    }
    status.snowflake_health = health.verdict();

    status
}
