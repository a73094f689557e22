// ABOUTME: SQL text for the Snowflake objects the installer manages.
// ABOUTME: API integration, external functions, and information schema lookups.

use crate::types::ConnectorFunction;

/// Name of the API integration created in every account.
pub const INTEGRATION_NAME: &str = "venafi_integration";

/// Quote a value as a single-quoted SQL string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn create_api_integration(name: &str, role_arn: &str, endpoint_url: &str) -> String {
    format!(
        "create or replace api integration {} api_provider = aws_api_gateway api_aws_role_arn = {} enabled = true api_allowed_prefixes = ({})",
        name,
        quote(role_arn),
        quote(endpoint_url)
    )
}

pub fn describe_integration(name: &str) -> String {
    format!("describe integration {}", name)
}

/// External function DDL under `sql_name`, which is either the function's
/// full name or its alias.
pub fn create_external_function(
    sql_name: &str,
    function: ConnectorFunction,
    integration: &str,
    endpoint_url: &str,
) -> String {
    format!(
        "create or replace external function {} {} returns variant api_integration = {} compression = none as {}",
        sql_name,
        function.sql_parameters(),
        integration,
        quote(&function_url(endpoint_url, function))
    )
}

pub fn function_exists(sql_name: &str) -> String {
    format!(
        "select function_name from information_schema.functions where function_name = {}",
        quote(&sql_name.to_uppercase())
    )
}

/// Gateway URL a function is served from. The endpoint carries a trailing slash.
pub fn function_url(endpoint_url: &str, function: ConnectorFunction) -> String {
    if endpoint_url.ends_with('/') {
        format!("{}{}", endpoint_url, function.suffix())
    } else {
        format!("{}/{}", endpoint_url, function.suffix())
    }
}
