// ABOUTME: IAM stage: Lambda execution role, Snowflake API role, and access policy.
// ABOUTME: Role names are recorded in deployment info as soon as they are created.

use snafu::ResultExt;

use super::error::{DeploymentInfoSnafu, InstallError, RolesSnafu};
use super::{DEFAULT_LAMBDA_ROLE, DEFAULT_SNOWFLAKE_ROLE, LAMBDA_POLICY_NAME, Run, Stage, policy};
use crate::diagnostics::Warning;
use crate::provider::{CloudOps, IamError, SqlOps};
use crate::status::ServiceStatus;
use crate::types::arn;

/// Role names in effect for this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleNames {
    pub lambda_role: String,
    pub snowflake_role: String,
    /// The Snowflake role was created by this run and only trusts the
    /// account root until the Snowflake stage rewrites its trust policy.
    pub snowflake_role_created: bool,
}

impl<C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'_, C, Q> {
    pub(super) async fn ensure_roles(
        &mut self,
        status: &ServiceStatus,
    ) -> Result<RoleNames, InstallError> {
        let info = self.store().read().await.context(DeploymentInfoSnafu)?;
        let mut roles = RoleNames {
            lambda_role: info.lambda_role_or(DEFAULT_LAMBDA_ROLE).to_string(),
            snowflake_role: info.snowflake_role_or(DEFAULT_SNOWFLAKE_ROLE).to_string(),
            snowflake_role_created: false,
        };

        let mut lambda_role_created = false;
        if !status.lambda_role.is_success() {
            self.output
                .progress(&format!("   Creating role {}...", roles.lambda_role));
            lambda_role_created = self
                .create_role(
                    &roles.lambda_role,
                    &policy::lambda_trust_policy(),
                    "Execution role for the Venafi connector Lambda functions",
                )
                .await?;
            let name = roles.lambda_role.clone();
            self.store()
                .update(|info| info.lambda_role_name = name)
                .await
                .context(DeploymentInfoSnafu)?;
            self.mark(Stage::Roles);
        }

        if !status.snowflake_role.is_success() {
            self.output
                .progress(&format!("   Creating role {}...", roles.snowflake_role));
            roles.snowflake_role_created = self
                .create_role(
                    &roles.snowflake_role,
                    &policy::snowflake_placeholder_trust_policy(&self.account_id),
                    "Role assumed by Snowflake to call the Venafi connector API",
                )
                .await?;
            let name = roles.snowflake_role.clone();
            self.store()
                .update(|info| info.snowflake_role_name = name)
                .await
                .context(DeploymentInfoSnafu)?;
            self.mark(Stage::Roles);
        }

        let mut policy_arn = info
            .policy_arn()
            .map(str::to_string)
            .unwrap_or_else(|| arn::policy_arn(&self.account_id, LAMBDA_POLICY_NAME));
        let policy_stale = !status.lambda_policy.is_success();
        if policy_stale {
            self.output
                .progress(&format!("   Creating policy {}...", LAMBDA_POLICY_NAME));
            let document = policy::lambda_access_policy(&self.config.aws.bucket);
            tracing::info!(policy = LAMBDA_POLICY_NAME, "creating policy");
            policy_arn = match self.cloud.create_policy(LAMBDA_POLICY_NAME, &document).await {
                Ok(arn) => arn,
                Err(IamError::AlreadyExists(_)) => {
                    self.report.diagnostics.warn(Warning::already_exists(format!(
                        "policy {LAMBDA_POLICY_NAME} already exists, reusing it"
                    )));
                    arn::policy_arn(&self.account_id, LAMBDA_POLICY_NAME)
                }
                Err(source) => {
                    return Err(source).context(RolesSnafu {
                        resource: LAMBDA_POLICY_NAME,
                    });
                }
            };
            let recorded = policy_arn.clone();
            self.store()
                .update(|info| info.policy_arn = recorded)
                .await
                .context(DeploymentInfoSnafu)?;
            self.mark(Stage::Roles);
        }

        if lambda_role_created || policy_stale {
            tracing::info!(role = %roles.lambda_role, policy = %policy_arn, "attaching policy");
            self.cloud
                .attach_role_policy(&roles.lambda_role, &policy_arn)
                .await
                .context(RolesSnafu {
                    resource: roles.lambda_role.as_str(),
                })?;
        }

        Ok(roles)
    }

    /// Create a role, tolerating one that already exists. Returns whether
    /// the role was newly created.
    async fn create_role(
        &mut self,
        name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<bool, InstallError> {
        tracing::info!(role = name, "creating role");
        match self.cloud.create_role(name, trust_policy, description).await {
            Ok(()) => Ok(true),
            Err(IamError::AlreadyExists(_)) => {
                self.report
                    .diagnostics
                    .warn(Warning::already_exists(format!("role {name} already exists, reusing it")));
                Ok(false)
            }
            Err(source) => Err(source).context(RolesSnafu { resource: name }),
        }
    }
}
