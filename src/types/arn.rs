// ABOUTME: Builders for the AWS ARNs and URLs that tie the deployment together.
// ABOUTME: Role, policy, Lambda, execute-api, and gateway endpoint forms.

use super::RestApiId;

pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

pub fn policy_arn(account_id: &str, policy_name: &str) -> String {
    format!("arn:aws:iam::{}:policy/{}", account_id, policy_name)
}

pub fn account_root_arn(account_id: &str) -> String {
    format!("arn:aws:iam::{}:root", account_id)
}

pub fn lambda_arn(zone: &str, account_id: &str, function_name: &str) -> String {
    format!("arn:aws:lambda:{}:{}:function:{}", zone, account_id, function_name)
}

/// Integration URI API Gateway uses to invoke a Lambda function.
pub fn lambda_invocation_uri(zone: &str, account_id: &str, function_name: &str) -> String {
    format!(
        "arn:aws:apigateway:{}:lambda:path/2015-03-31/functions/{}/invocations",
        zone,
        lambda_arn(zone, account_id, function_name)
    )
}

/// Source ARN that scopes a Lambda invoke permission to one REST API.
pub fn execute_api_source_arn(zone: &str, account_id: &str, rest_api_id: &RestApiId) -> String {
    format!("arn:aws:execute-api:{}:{}:{}/*/*", zone, account_id, rest_api_id)
}

/// Public invoke URL of a deployed stage, with trailing slash.
pub fn gateway_endpoint_url(rest_api_id: &RestApiId, zone: &str, stage: &str) -> String {
    format!(
        "https://{}.execute-api.{}.amazonaws.com/{}/",
        rest_api_id, zone, stage
    )
}
