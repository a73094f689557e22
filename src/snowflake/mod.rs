// ABOUTME: Snowflake-side operations built on the SqlOps capability.
// ABOUTME: Creates the API integration, reads its AWS identity, creates functions.

pub mod ddl;

use crate::config::SnowflakeConfig;
use crate::provider::{SqlError, SqlOps};
use crate::types::ConnectorFunction;

const EXTERNAL_ID_PROPERTY: &str = "API_AWS_EXTERNAL_ID";
const IAM_USER_ARN_PROPERTY: &str = "API_AWS_IAM_USER_ARN";

/// AWS principal Snowflake uses when calling through an integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationIdentity {
    pub external_id: String,
    pub iam_user_arn: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SnowflakeError {
    #[error(transparent)]
    Sql(#[from] SqlError),

    #[error("integration {integration} does not report {property}")]
    MissingProperty {
        integration: String,
        property: &'static str,
    },
}

/// Create or replace the API integration for `endpoint_url`.
pub async fn create_api_integration<Q: SqlOps + ?Sized>(
    sql: &Q,
    account: &SnowflakeConfig,
    name: &str,
    role_arn: &str,
    endpoint_url: &str,
) -> Result<(), SnowflakeError> {
    tracing::info!(account = %account.account, integration = name, endpoint_url, "creating API integration");
    sql.execute(account, &ddl::create_api_integration(name, role_arn, endpoint_url))
        .await?;
    Ok(())
}

/// Read the external id and IAM user ARN Snowflake generated for `name`.
pub async fn describe_integration<Q: SqlOps + ?Sized>(
    sql: &Q,
    account: &SnowflakeConfig,
    name: &str,
) -> Result<IntegrationIdentity, SnowflakeError> {
    let result = sql.execute(account, &ddl::describe_integration(name)).await?;

    let property = |wanted: &'static str| -> Result<String, SnowflakeError> {
        (0..result.rows.len())
            .find(|&row| result.value(row, "property") == Some(wanted))
            .and_then(|row| result.value(row, "property_value"))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| SnowflakeError::MissingProperty {
                integration: name.to_string(),
                property: wanted,
            })
    };

    Ok(IntegrationIdentity {
        external_id: property(EXTERNAL_ID_PROPERTY)?,
        iam_user_arn: property(IAM_USER_ARN_PROPERTY)?,
    })
}

/// Create or replace one external function and its alias.
pub async fn create_external_function<Q: SqlOps + ?Sized>(
    sql: &Q,
    account: &SnowflakeConfig,
    function: ConnectorFunction,
    integration: &str,
    endpoint_url: &str,
) -> Result<(), SnowflakeError> {
    for name in [function.sql_name(), function.sql_alias()] {
        tracing::info!(account = %account.account, function = name, "creating external function");
        sql.execute(
            account,
            &ddl::create_external_function(name, function, integration, endpoint_url),
        )
        .await?;
    }
    Ok(())
}
