// ABOUTME: Lambda stage: (re)create the six handler functions and wire them into the gateway.
// ABOUTME: Missing functions are created, broken ones deleted first, healthy ones left alone.

use snafu::ResultExt;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::{DeploymentInfoSnafu, GatewaySnafu, InstallError, IntegrationSnafu, LambdaSnafu};
use super::{GATEWAY_METHOD, GATEWAY_STAGE, GatewayTarget, HandlerPackage, RoleNames, Run};
use crate::config::CREDENTIALS_KEY;
use crate::diagnostics::Warning;
use crate::provider::{
    CloudOps, FunctionSpec, IntegrationSpec, InvokePermission, LambdaError, SqlOps, child_resource,
};
use crate::retry::{RetryError, retry};
use crate::status::{ServiceStatus, StatusResult};
use crate::types::{ConnectorFunction, arn};

const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";

impl<C: CloudOps + ?Sized, Q: SqlOps + ?Sized> Run<'_, C, Q> {
    pub(super) async fn deploy_lambdas(
        &mut self,
        status: &ServiceStatus,
        roles: &RoleNames,
        gateway: &GatewayTarget,
    ) -> Result<(), InstallError> {
        let needs_create = ConnectorFunction::ALL
            .iter()
            .any(|f| !status.lambda_details.get(*f).is_success());
        let package = if needs_create {
            Some(self.handler_package().await?)
        } else {
            None
        };
        let role_arn = arn::role_arn(&self.account_id, &roles.lambda_role);

        for function in ConnectorFunction::ALL {
            let name = function.lambda_name();
            let created = match (status.lambda_details.get(function), &package) {
                (StatusResult::Success, _) => {
                    tracing::debug!(function = %name, "function healthy, keeping it");
                    false
                }
                (current, Some(package)) => {
                    if current.is_error() {
                        self.delete_function(&name).await?;
                    }
                    self.output.progress(&format!("   Creating function {name}..."));
                    let spec = self.function_spec(function, &role_arn, package.bytes());
                    let function_arn = self.create_function(&spec).await?;
                    self.store()
                        .update(|info| info.record_function_arn(function_arn))
                        .await
                        .context(DeploymentInfoSnafu)?;
                    true
                }
                (_, None) => false,
            };

            if created || gateway.replaced {
                self.grant_invoke(&name, gateway).await?;
            }
        }

        self.integrate(gateway).await?;

        tracing::info!(api = %gateway.api, stage = GATEWAY_STAGE, "deploying REST API");
        self.output
            .progress(&format!("   Deploying gateway to stage '{GATEWAY_STAGE}'..."));
        self.cloud
            .create_deployment(&gateway.api, GATEWAY_STAGE)
            .await
            .context(GatewaySnafu)?;
        Ok(())
    }

    async fn handler_package(&mut self) -> Result<HandlerPackage, InstallError> {
        if let Some(package) = &self.package {
            return Ok(package.clone());
        }
        let package = HandlerPackage::load(&self.config.lambda.package).await?;
        self.package = Some(package.clone());
        Ok(package)
    }

    fn function_spec(
        &self,
        function: ConnectorFunction,
        role_arn: &str,
        package: Arc<[u8]>,
    ) -> FunctionSpec {
        let environment = BTreeMap::from([
            ("ZONE".to_string(), self.config.aws.zone.clone()),
            ("S3_BUCKET".to_string(), self.config.aws.bucket.clone()),
            ("CREDENTIAL_FILE_NAME".to_string(), CREDENTIALS_KEY.to_string()),
        ]);
        FunctionSpec {
            name: function.lambda_name(),
            role_arn: role_arn.to_string(),
            handler: function.suffix().to_string(),
            runtime: self.config.lambda.runtime.clone(),
            timeout: self.config.lambda.timeout,
            environment,
            package,
        }
    }

    async fn delete_function(&mut self, name: &str) -> Result<(), InstallError> {
        self.output
            .progress(&format!("   Deleting broken function {name}..."));
        tracing::info!(function = name, "deleting function");
        match self.cloud.delete_function(name).await {
            Ok(()) => Ok(()),
            Err(LambdaError::NotFound(_)) => {
                self.report
                    .diagnostics
                    .warn(Warning::already_deleted(format!("function {name} was already gone")));
                Ok(())
            }
            Err(source) => Err(source).context(LambdaSnafu { function: name }),
        }
    }

    /// Create under retry. A conflict means the name is taken and another
    /// attempt cannot change that.
    async fn create_function(&self, spec: &FunctionSpec) -> Result<String, InstallError> {
        tracing::info!(function = %spec.name, runtime = %spec.runtime, "creating function");
        let cloud = self.cloud;
        retry(&self.retry, || async move {
            cloud.create_function(spec).await.map_err(|e| {
                if matches!(e, LambdaError::Conflict(_)) {
                    RetryError::permanent(e)
                } else {
                    RetryError::Transient(e)
                }
            })
        })
        .await
        .context(LambdaSnafu {
            function: spec.name.as_str(),
        })
    }

    async fn grant_invoke(&mut self, name: &str, gateway: &GatewayTarget) -> Result<(), InstallError> {
        let permission = InvokePermission {
            function_name: name.to_string(),
            statement_id: format!("{name}-{}-invoke", gateway.api),
            principal: GATEWAY_PRINCIPAL.to_string(),
            source_arn: arn::execute_api_source_arn(self.zone(), &self.account_id, &gateway.api),
        };
        tracing::info!(function = name, statement = %permission.statement_id, "granting invoke permission");
        match self.cloud.add_permission(&permission).await {
            Ok(()) => Ok(()),
            Err(LambdaError::Conflict(_)) => {
                self.report.diagnostics.warn(Warning::permission_exists(format!(
                    "invoke permission {} already present on {name}",
                    permission.statement_id
                )));
                Ok(())
            }
            Err(source) => Err(source).context(LambdaSnafu { function: name }),
        }
    }

    /// Give every function a `POST /<suffix>` proxy integration.
    async fn integrate(&self, gateway: &GatewayTarget) -> Result<(), InstallError> {
        let resources = self
            .cloud
            .get_resources(&gateway.api)
            .await
            .context(GatewaySnafu)?;

        for function in ConnectorFunction::ALL {
            let name = function.lambda_name();
            let existing = child_resource(&resources, &gateway.root, function.suffix());
            let resource_id = match existing {
                Some(resource) => resource.id.clone(),
                None => {
                    tracing::info!(path = function.suffix(), "creating gateway resource");
                    self.cloud
                        .create_resource(&gateway.api, &gateway.root, function.suffix())
                        .await
                        .context(IntegrationSnafu { function: name.as_str() })?
                }
            };

            if !existing.is_some_and(|resource| resource.has_method(GATEWAY_METHOD)) {
                self.cloud
                    .put_method(&gateway.api, &resource_id, GATEWAY_METHOD)
                    .await
                    .context(IntegrationSnafu { function: name.as_str() })?;
            }

            let integration = IntegrationSpec {
                http_method: GATEWAY_METHOD.to_string(),
                integration_http_method: GATEWAY_METHOD.to_string(),
                uri: arn::lambda_invocation_uri(self.zone(), &self.account_id, &name),
            };
            self.cloud
                .put_integration(&gateway.api, &resource_id, &integration)
                .await
                .context(IntegrationSnafu { function: name.as_str() })?;
            tracing::debug!(function = %name, resource = %resource_id, "integration in place");
        }
        Ok(())
    }
}
