// ABOUTME: Reconciler that converges AWS and Snowflake toward the configured deployment.
// ABOUTME: Each stage is gated by the status snapshot and skipped when already healthy.

mod bucket;
mod error;
mod gateway;
mod lambdas;
mod package;
pub mod policy;
mod roles;
mod snowflake;

pub use error::*;
pub use gateway::GatewayTarget;
pub use package::HandlerPackage;
pub use roles::RoleNames;

use snafu::ResultExt;

use crate::config::Config;
use crate::deployment_info::DeploymentInfoStore;
use crate::diagnostics::Diagnostics;
use crate::output::Output;
use crate::provider::{CloudOps, SqlOps};
use crate::retry::RetryPolicy;
use crate::status::check_status;

pub const DEFAULT_LAMBDA_ROLE: &str = "venafi-snowflake-lambda-role";
pub const DEFAULT_SNOWFLAKE_ROLE: &str = "venafi-snowflake-api-role";
pub const LAMBDA_POLICY_NAME: &str = "venafi-snowflake-lambda-policy";
pub const GATEWAY_NAME: &str = "venafi-snowflake-connector";
pub const GATEWAY_STAGE: &str = "dev";
/// Method every function resource is invoked through.
pub const GATEWAY_METHOD: &str = "POST";

/// Install stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Bucket,
    Roles,
    Gateway,
    Lambdas,
    Snowflake,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Bucket => "bucket",
            Stage::Roles => "roles",
            Stage::Gateway => "gateway",
            Stage::Lambdas => "lambdas",
            Stage::Snowflake => "snowflake",
        }
    }
}

/// What a completed run did.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Stages that issued at least one write.
    pub stages: Vec<Stage>,
    pub diagnostics: Diagnostics,
}

impl InstallReport {
    /// True when every stage was skipped.
    pub fn unchanged(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Drives one install run against the given providers.
pub struct Installer<'a, C: CloudOps + ?Sized, Q: SqlOps + ?Sized> {
    config: &'a Config,
    cloud: &'a C,
    sql: &'a Q,
    output: &'a Output,
    package: Option<HandlerPackage>,
}

impl<'a, C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Installer<'a, C, Q> {
    pub fn new(config: &'a Config, cloud: &'a C, sql: &'a Q, output: &'a Output) -> Self {
        Self {
            config,
            cloud,
            sql,
            output,
            package: None,
        }
    }

    /// Use an already loaded handler package instead of reading
    /// `lambda.package` from disk.
    pub fn with_package(mut self, package: HandlerPackage) -> Self {
        self.package = Some(package);
        self
    }

    pub async fn run(self) -> Result<InstallReport, InstallError> {
        let Installer {
            config,
            cloud,
            sql,
            output,
            package,
        } = self;

        output.progress("Checking deployment status...");
        let mut status = check_status(config, cloud, sql).await;

        if !status.aws_reachable() {
            let reason = status
                .aws_connection
                .cause()
                .or_else(|| status.aws_credentials.cause())
                .map(|cause| cause.to_string())
                .unwrap_or_else(|| "AWS connection not verified".to_string());
            return PreflightSnafu {
                reason,
                status: Box::new(status),
            }
            .fail();
        }

        let account_id = cloud.account_id().await.context(IdentitySnafu)?;
        tracing::debug!(account_id, "resolved AWS account");

        let mut run = Run {
            config,
            cloud,
            sql,
            output,
            retry: config.retry,
            account_id,
            package,
            report: InstallReport::default(),
        };

        output.progress(&format!("1. Bucket '{}'", config.aws.bucket));
        if status.bucket_ready() {
            output.progress("   Bucket and credential file already in place");
        } else {
            run.ensure_bucket().await?;
            run.mark(Stage::Bucket);
        }

        if status.short_circuited() {
            tracing::debug!("re-checking status now that the bucket exists");
            status = check_status(config, cloud, sql).await;
            if !status.aws_bucket.is_success() {
                return BucketUnusableSnafu {
                    bucket: config.aws.bucket.clone(),
                    reason: status.aws_bucket.to_string(),
                }
                .fail();
            }
        }
        if status.deployment_info_read.is_error() {
            run.store().read().await.context(DeploymentInfoSnafu)?;
        }

        output.progress("2. IAM roles and policy");
        let roles = run.ensure_roles(&status).await?;

        output.progress("3. API gateway");
        let gateway = run.ensure_gateway(&status, &roles).await?;

        let lambdas_stale =
            !status.aws_lambdas.is_success() || !status.gateway_integrations.is_success();
        if lambdas_stale || gateway.replaced {
            output.progress("4. Lambda functions and gateway integrations");
            run.deploy_lambdas(&status, &roles, &gateway).await?;
            run.mark(Stage::Lambdas);
        } else {
            output.progress("4. Lambda functions already online");
        }

        let snowflake_stale =
            !status.snowflake_health.is_success() || roles.snowflake_role_created;
        if snowflake_stale || gateway.replaced {
            output.progress("5. Snowflake API integration and external functions");
            run.configure_snowflake(&roles, &gateway).await?;
            run.mark(Stage::Snowflake);
        } else {
            output.progress("5. Snowflake integration and functions already in place");
        }

        for warning in run.report.diagnostics.warnings() {
            output.warning(&warning.message);
        }
        output.success("Install complete");
        Ok(run.report)
    }
}

/// State shared by the stages of one run.
struct Run<'a, C: CloudOps + ?Sized, Q: SqlOps + ?Sized> {
    config: &'a Config,
    cloud: &'a C,
    sql: &'a Q,
    output: &'a Output,
    retry: RetryPolicy,
    account_id: String,
    package: Option<HandlerPackage>,
    report: InstallReport,
}

impl<'a, C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'a, C, Q> {
    fn store(&self) -> DeploymentInfoStore<'a, C> {
        DeploymentInfoStore::new(self.cloud, &self.config.aws.bucket)
    }

    fn zone(&self) -> &'a str {
        &self.config.aws.zone
    }

    fn mark(&mut self, stage: Stage) {
        if !self.report.stages.contains(&stage) {
            self.report.stages.push(stage);
        }
    }
}
