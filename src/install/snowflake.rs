// ABOUTME: Snowflake stage: API integration, cross-account trust, and external functions.
// ABOUTME: Every statement is create-or-replace, so re-running the stage is harmless.

use snafu::ResultExt;

use super::error::{DeploymentInfoSnafu, InstallError, RolesSnafu, SnowflakeSnafu};
use super::{GatewayTarget, RoleNames, Run, policy};
use crate::deployment_info::SnowflakeTrust;
use crate::provider::{CloudOps, SqlOps};
use crate::snowflake::{self as warehouse, ddl::INTEGRATION_NAME};
use crate::types::{ConnectorFunction, arn};

impl<C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'_, C, Q> {
    pub(super) async fn configure_snowflake(
        &mut self,
        roles: &RoleNames,
        gateway: &GatewayTarget,
    ) -> Result<(), InstallError> {
        let role_arn = arn::role_arn(&self.account_id, &roles.snowflake_role);
        let config = self.config;

        for account in config.snowflake.iter() {
            let context = || SnowflakeSnafu {
                account: account.account.as_str(),
            };
            self.output
                .progress(&format!("   Account '{}'", account.account));

            warehouse::create_api_integration(
                self.sql,
                account,
                INTEGRATION_NAME,
                &role_arn,
                &gateway.endpoint_url,
            )
            .await
            .context(context())?;

            let identity = warehouse::describe_integration(self.sql, account, INTEGRATION_NAME)
                .await
                .context(context())?;
            tracing::debug!(
                account = %account.account,
                external_id = %identity.external_id,
                user_arn = %identity.iam_user_arn,
                "captured integration identity"
            );

            let trust = SnowflakeTrust {
                account: account.account.clone(),
                external_id: identity.external_id,
                user_arn: identity.iam_user_arn,
            };
            let info = self
                .store()
                .update(move |info| info.upsert_trust(trust))
                .await
                .context(DeploymentInfoSnafu)?;

            // Accounts dropped from the config lose their trust statement.
            let trusts: Vec<SnowflakeTrust> = info
                .snowflake_trust
                .into_iter()
                .filter(|t| config.snowflake.iter().any(|a| a.account == t.account))
                .collect();
            tracing::info!(role = %roles.snowflake_role, statements = trusts.len(), "updating trust policy");
            self.cloud
                .update_assume_role_policy(&roles.snowflake_role, &policy::snowflake_trust_policy(&trusts))
                .await
                .context(RolesSnafu {
                    resource: roles.snowflake_role.as_str(),
                })?;

            for function in ConnectorFunction::ALL {
                warehouse::create_external_function(
                    self.sql,
                    account,
                    function,
                    INTEGRATION_NAME,
                    &gateway.endpoint_url,
                )
                .await
                .context(context())?;
            }
            self.output.progress(&format!(
                "   {} external functions and aliases created",
                ConnectorFunction::ALL.len()
            ));
        }
        Ok(())
    }
}
