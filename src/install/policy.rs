// ABOUTME: IAM and API Gateway policy documents used by the installer.
// ABOUTME: Trust policies for both roles, the Lambda access policy, the REST API policy.

use serde_json::{Value, json};

use crate::deployment_info::SnowflakeTrust;
use crate::types::arn;

const VERSION: &str = "2012-10-17";

/// Lets the Lambda service assume the execution role.
pub fn lambda_trust_policy() -> String {
    json!({
        "Version": VERSION,
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "lambda.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
    .to_string()
}

/// Trust held by the Snowflake role until the first integration reports
/// its IAM user.
pub fn snowflake_placeholder_trust_policy(account_id: &str) -> String {
    json!({
        "Version": VERSION,
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": arn::account_root_arn(account_id) },
            "Action": "sts:AssumeRole"
        }]
    })
    .to_string()
}

/// One statement per Snowflake integration, each pinned to its external id.
pub fn snowflake_trust_policy(trusts: &[SnowflakeTrust]) -> String {
    let statements: Vec<Value> = trusts
        .iter()
        .map(|trust| {
            json!({
                "Effect": "Allow",
                "Principal": { "AWS": trust.user_arn },
                "Action": "sts:AssumeRole",
                "Condition": { "StringEquals": { "sts:ExternalId": trust.external_id } }
            })
        })
        .collect();
    json!({ "Version": VERSION, "Statement": statements }).to_string()
}

/// Object access on the managed bucket plus CloudWatch log writes.
pub fn lambda_access_policy(bucket: &str) -> String {
    json!({
        "Version": VERSION,
        "Statement": [
            {
                "Effect": "Allow",
                "Action": ["s3:GetObject", "s3:PutObject"],
                "Resource": format!("arn:aws:s3:::{bucket}/*")
            },
            {
                "Effect": "Allow",
                "Action": "s3:ListBucket",
                "Resource": format!("arn:aws:s3:::{bucket}")
            },
            {
                "Effect": "Allow",
                "Action": ["logs:CreateLogGroup", "logs:CreateLogStream", "logs:PutLogEvents"],
                "Resource": "*"
            }
        ]
    })
    .to_string()
}

/// Allows the Snowflake role's assumed session to invoke POST methods.
pub fn rest_api_policy(account_id: &str, zone: &str, stage: &str, snowflake_role: &str) -> String {
    json!({
        "Version": VERSION,
        "Statement": [{
            "Effect": "Allow",
            "Principal": {
                "AWS": format!("arn:aws:sts::{account_id}:assumed-role/{snowflake_role}/snowflake")
            },
            "Action": "execute-api:Invoke",
            "Resource": format!("arn:aws:execute-api:{zone}:{account_id}:*/{stage}/POST/*")
        }]
    })
    .to_string()
}
