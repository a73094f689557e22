// ABOUTME: One-shot, read-only checks that classify a single resource.
// ABOUTME: Maps provider "not found" to Missing and every other failure to Error.

use std::fmt::Display;

use crate::config::SnowflakeConfig;
use crate::provider::{
    GatewayError, GatewayOps, GatewayResource, IamError, IamOps, LambdaError, LambdaOps,
    ObjectStore, ObjectStoreError, SqlOps, child_resource,
};
use crate::snowflake::ddl;
use crate::status::StatusResult;
use crate::types::{ConnectorFunction, GatewayResourceId, RestApiId};

/// Provider errors that can say whether the target simply does not exist.
pub trait ProbeError: Display {
    fn is_not_found(&self) -> bool;
}

impl ProbeError for ObjectStoreError {
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            ObjectStoreError::NoSuchBucket(_) | ObjectStoreError::NoSuchKey(_)
        )
    }
}

impl ProbeError for IamError {
    fn is_not_found(&self) -> bool {
        matches!(self, IamError::NotFound(_))
    }
}

impl ProbeError for LambdaError {
    fn is_not_found(&self) -> bool {
        matches!(self, LambdaError::NotFound(_))
    }
}

impl ProbeError for GatewayError {
    fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

/// Turn a probe call outcome into a verdict.
pub fn classify<E: ProbeError>(outcome: Result<(), E>, what: &str) -> StatusResult {
    match outcome {
        Ok(()) => StatusResult::Success,
        Err(e) if e.is_not_found() => StatusResult::missing(format!("{what} not found")),
        Err(e) => StatusResult::error(format!("{what}: {e}")),
    }
}

/// Result of the combined connectivity, credential, and bucket check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketProbe {
    pub connection: StatusResult,
    pub credentials: StatusResult,
    pub bucket: StatusResult,
}

/// List the bucket once and split the outcome into three verdicts.
///
/// A rejected signature or key stops at the credentials verdict; any failure
/// that is neither a credential nor a missing-bucket error is reported as a
/// connection failure.
pub async fn probe_bucket<S: ObjectStore + ?Sized>(store: &S, bucket: &str) -> BucketProbe {
    let outcome = store.list_objects(bucket).await;
    let probe = match outcome {
        Ok(()) => BucketProbe {
            connection: StatusResult::Success,
            credentials: StatusResult::Success,
            bucket: StatusResult::Success,
        },
        Err(ObjectStoreError::NoSuchBucket(_)) => BucketProbe {
            connection: StatusResult::Success,
            credentials: StatusResult::Success,
            bucket: StatusResult::missing(format!("bucket '{bucket}' not found")),
        },
        Err(ObjectStoreError::InvalidCredentials(msg)) => BucketProbe {
            connection: StatusResult::Success,
            credentials: StatusResult::error(format!("AWS credentials rejected: {msg}")),
            bucket: StatusResult::NotChecked,
        },
        Err(e) => BucketProbe {
            connection: StatusResult::error(format!("cannot reach bucket '{bucket}': {e}")),
            credentials: StatusResult::NotChecked,
            bucket: StatusResult::NotChecked,
        },
    };
    tracing::debug!(
        bucket,
        connection = %probe.connection,
        credentials = %probe.credentials,
        bucket_state = %probe.bucket,
        "probed bucket"
    );
    probe
}

/// Check that `key` exists in `bucket`.
pub async fn probe_object<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    key: &str,
) -> StatusResult {
    let result = classify(store.head_object(bucket, key).await, &format!("object '{key}'"));
    tracing::debug!(bucket, key, status = %result, "probed object");
    result
}

pub async fn probe_role<I: IamOps + ?Sized>(iam: &I, name: &str) -> StatusResult {
    let result = classify(iam.get_role(name).await, &format!("role '{name}'"));
    tracing::debug!(role = name, status = %result, "probed role");
    result
}

pub async fn probe_policy<I: IamOps + ?Sized>(iam: &I, arn: &str) -> StatusResult {
    let result = classify(iam.get_policy(arn).await, &format!("policy '{arn}'"));
    tracing::debug!(policy = arn, status = %result, "probed policy");
    result
}

/// Check one Lambda function. A function reporting a failed state is Error.
pub async fn probe_lambda<L: LambdaOps + ?Sized>(lambda: &L, name: &str) -> StatusResult {
    let result = classify(lambda.get_function(name).await, &format!("function '{name}'"));
    tracing::debug!(function = name, status = %result, "probed lambda");
    result
}

pub async fn probe_rest_api<G: GatewayOps + ?Sized>(gateway: &G, id: &RestApiId) -> StatusResult {
    let result = classify(gateway.get_rest_api(id).await, &format!("REST API '{id}'"));
    tracing::debug!(rest_api = %id, status = %result, "probed REST API");
    result
}

/// Check that every function has its resource under the root and that the
/// resource carries `method`. `root` falls back to the API's `/` resource.
pub async fn probe_gateway_wiring<G: GatewayOps + ?Sized>(
    gateway: &G,
    api: &RestApiId,
    root: Option<&GatewayResourceId>,
    method: &str,
) -> StatusResult {
    let result = match gateway.get_resources(api).await {
        Ok(resources) => wiring_verdict(&resources, root, method),
        Err(e) if e.is_not_found() => {
            StatusResult::missing(format!("resources of REST API '{api}' not found"))
        }
        Err(e) => StatusResult::error(format!("resources of REST API '{api}': {e}")),
    };
    tracing::debug!(rest_api = %api, status = %result, "probed gateway wiring");
    result
}

fn wiring_verdict(
    resources: &[GatewayResource],
    root: Option<&GatewayResourceId>,
    method: &str,
) -> StatusResult {
    let root = match root {
        Some(root) => root,
        None => match resources.iter().find(|resource| resource.is_root()) {
            Some(resource) => &resource.id,
            None => return StatusResult::missing("root resource not found"),
        },
    };
    for function in ConnectorFunction::ALL {
        let path = function.suffix();
        match child_resource(resources, root, path) {
            None => return StatusResult::missing(format!("gateway resource /{path} not found")),
            Some(resource) if !resource.has_method(method) => {
                return StatusResult::missing(format!("{method} method on /{path} not found"));
            }
            Some(_) => {}
        }
    }
    StatusResult::Success
}

/// Open a session to one Snowflake account.
pub async fn probe_sql_connection<Q: SqlOps + ?Sized>(
    sql: &Q,
    account: &SnowflakeConfig,
) -> StatusResult {
    let result = match sql.ping(account).await {
        Ok(()) => StatusResult::Success,
        Err(e) => StatusResult::error(e.to_string()),
    };
    tracing::debug!(account = %account.account, status = %result, "probed Snowflake connection");
    result
}

/// Look the external function up in the account's information schema.
pub async fn probe_external_function<Q: SqlOps + ?Sized>(
    sql: &Q,
    account: &SnowflakeConfig,
    function: ConnectorFunction,
) -> StatusResult {
    let statement = ddl::function_exists(function.sql_name());
    let result = match sql.execute(account, &statement).await {
        Ok(rows) if rows.is_empty() => {
            StatusResult::missing(format!("external function {} not found", function.sql_name()))
        }
        Ok(_) => StatusResult::Success,
        Err(e) => StatusResult::error(format!(
            "cannot look up external function {}: {e}",
            function.sql_name()
        )),
    };
    tracing::debug!(
        account = %account.account,
        function = function.sql_name(),
        status = %result,
        "probed external function"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_separates_absent_from_broken() {
        assert_eq!(classify::<IamError>(Ok(()), "role"), StatusResult::Success);
        assert!(classify(Err(IamError::NotFound("r".into())), "role 'r'").is_missing());
        assert!(classify(Err(IamError::Provider("throttled".into())), "role 'r'").is_error());
    }

    #[test]
    fn classify_keeps_provider_message_in_cause() {
        let result = classify(Err(GatewayError::Provider("timeout".into())), "REST API 'x'");
        assert_eq!(
            result.cause().map(|c| c.as_str()),
            Some("REST API 'x': gateway error: timeout")
        );
    }

    fn wired(methods: &[&str]) -> Vec<GatewayResource> {
        let mut resources = vec![GatewayResource {
            id: GatewayResourceId::new("root"),
            parent_id: None,
            path: "/".into(),
            path_part: None,
            methods: Vec::new(),
        }];
        for (i, function) in ConnectorFunction::ALL.into_iter().enumerate() {
            resources.push(GatewayResource {
                id: GatewayResourceId::new(format!("r{i}")),
                parent_id: Some(GatewayResourceId::new("root")),
                path: format!("/{}", function.suffix()),
                path_part: Some(function.suffix().to_string()),
                methods: methods.iter().map(|m| m.to_string()).collect(),
            });
        }
        resources
    }

    #[test]
    fn fully_wired_gateway_is_success() {
        assert_eq!(wiring_verdict(&wired(&["POST"]), None, "POST"), StatusResult::Success);
        let root = GatewayResourceId::new("root");
        assert_eq!(
            wiring_verdict(&wired(&["POST"]), Some(&root), "POST"),
            StatusResult::Success
        );
    }

    #[test]
    fn absent_resource_or_method_is_missing() {
        let mut resources = wired(&["POST"]);
        resources.pop();
        assert!(wiring_verdict(&resources, None, "POST").is_missing());
        assert!(wiring_verdict(&wired(&[]), None, "POST").is_missing());
        assert!(wiring_verdict(&wired(&["POST"])[..1], None, "POST").is_missing());
    }

    #[test]
    fn resources_under_another_parent_do_not_count() {
        let other = GatewayResourceId::new("elsewhere");
        assert!(wiring_verdict(&wired(&["POST"]), Some(&other), "POST").is_missing());
    }

    #[test]
    fn unhealthy_lambda_is_not_a_missing_one() {
        assert!(!LambdaError::Unhealthy("failed".into()).is_not_found());
        assert!(LambdaError::NotFound("f".into()).is_not_found());
    }
}
