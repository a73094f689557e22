// ABOUTME: Gateway stage: create the REST API when the recorded one is missing or broken.
// ABOUTME: A replaced gateway forces the Lambda and Snowflake stages to run again.

use snafu::ResultExt;

use super::error::{DeploymentInfoSnafu, GatewaySnafu, InstallError};
use super::{GATEWAY_NAME, GATEWAY_STAGE, RoleNames, Run, Stage, policy};
use crate::provider::{CloudOps, GatewayError, RestApiSpec, SqlOps};
use crate::retry::{RetryError, retry};
use crate::status::ServiceStatus;
use crate::types::{GatewayResourceId, RestApiId, arn};

/// The REST API the remaining stages wire into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayTarget {
    pub api: RestApiId,
    /// Root resource (`/`) that function resources hang off.
    pub root: GatewayResourceId,
    /// Invoke URL of the deployed stage, with a trailing slash.
    pub endpoint_url: String,
    /// True when this run created a new REST API.
    pub replaced: bool,
}

impl<C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'_, C, Q> {
    pub(super) async fn ensure_gateway(
        &mut self,
        status: &ServiceStatus,
        roles: &RoleNames,
    ) -> Result<GatewayTarget, InstallError> {
        let info = self.store().read().await.context(DeploymentInfoSnafu)?;

        if status.aws_gateway.is_success() {
            if let Some(api) = info.gateway_id() {
                let root = match info.gateway_parent_resource_id() {
                    Some(root) => root,
                    None => self.root_resource(&api).await?,
                };
                let endpoint_url = info
                    .gateway_endpoint_url()
                    .map(str::to_string)
                    .unwrap_or_else(|| arn::gateway_endpoint_url(&api, self.zone(), GATEWAY_STAGE));
                self.output
                    .progress(&format!("   Gateway {api} already exists"));
                return Ok(GatewayTarget {
                    api,
                    root,
                    endpoint_url,
                    replaced: false,
                });
            }
        }

        if let Some(cause) = status.aws_gateway.cause() {
            tracing::info!(%cause, "replacing API gateway");
        }
        self.output
            .progress(&format!("   Creating REST API {GATEWAY_NAME}..."));
        let spec = RestApiSpec {
            name: GATEWAY_NAME.to_string(),
            description: "Venafi machine identity functions for Snowflake".to_string(),
            policy: policy::rest_api_policy(
                &self.account_id,
                self.zone(),
                GATEWAY_STAGE,
                &roles.snowflake_role,
            ),
        };
        let spec = &spec;
        let cloud = self.cloud;
        let api = retry(&self.retry, || async move {
            cloud
                .create_rest_api(spec)
                .await
                .map_err(RetryError::Transient)
        })
        .await
        .context(GatewaySnafu)?;
        tracing::info!(%api, "created REST API");

        let root = self.root_resource(&api).await?;
        let endpoint_url = arn::gateway_endpoint_url(&api, self.zone(), GATEWAY_STAGE);

        let target = GatewayTarget {
            api,
            root,
            endpoint_url,
            replaced: true,
        };
        let recorded = target.clone();
        self.store()
            .update(move |info| {
                info.gateway_id = recorded.api.into_inner();
                info.gateway_parent_resource_id = recorded.root.into_inner();
                info.gateway_endpoint_url = recorded.endpoint_url;
            })
            .await
            .context(DeploymentInfoSnafu)?;
        self.mark(Stage::Gateway);
        Ok(target)
    }

    async fn root_resource(&self, api: &RestApiId) -> Result<GatewayResourceId, InstallError> {
        let resources = self.cloud.get_resources(api).await.context(GatewaySnafu)?;
        resources
            .into_iter()
            .find(|resource| resource.is_root())
            .map(|resource| resource.id)
            .ok_or_else(|| GatewayError::NotFound(format!("root resource of REST API {api}")))
            .context(GatewaySnafu)
    }
}
