// ABOUTME: GatewayOps implementation on the API Gateway (REST) SDK client.
// ABOUTME: Regional REST APIs with IAM-authorized methods and Lambda proxy integrations.

use async_trait::async_trait;
use aws_sdk_apigateway::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_apigateway::types::{EndpointConfiguration, EndpointType, IntegrationType, Resource};

use super::{AwsClients, describe};
use crate::provider::traits::{
    GatewayError, GatewayOps, GatewayResource, IntegrationSpec, RestApiSpec,
};
use crate::types::{GatewayResourceId, RestApiId};

const AUTHORIZATION_TYPE: &str = "AWS_IAM";
const PAGE_SIZE: i32 = 500;

fn map_gateway_error<E, R>(err: SdkError<E, R>, entity: &str) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("NotFoundException") => GatewayError::NotFound(entity.to_string()),
        Some("ConflictException") => GatewayError::Conflict(describe(err)),
        _ => GatewayError::Provider(describe(err)),
    }
}

fn convert_resource(resource: &Resource) -> Option<GatewayResource> {
    let mut methods: Vec<String> = resource
        .resource_methods()
        .map(|methods| methods.keys().cloned().collect())
        .unwrap_or_default();
    methods.sort();
    Some(GatewayResource {
        id: GatewayResourceId::new(resource.id()?),
        parent_id: resource.parent_id().map(GatewayResourceId::new),
        path: resource.path().unwrap_or_default().to_string(),
        path_part: resource.path_part().map(str::to_string),
        methods,
    })
}

#[async_trait]
impl GatewayOps for AwsClients {
    async fn get_rest_api(&self, id: &RestApiId) -> Result<(), GatewayError> {
        self.gateway
            .get_rest_api()
            .rest_api_id(id.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_gateway_error(e, id.as_str()))
    }

    async fn create_rest_api(&self, spec: &RestApiSpec) -> Result<RestApiId, GatewayError> {
        let output = self
            .gateway
            .create_rest_api()
            .name(&spec.name)
            .description(&spec.description)
            .policy(&spec.policy)
            .endpoint_configuration(
                EndpointConfiguration::builder()
                    .types(EndpointType::Regional)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| map_gateway_error(e, &spec.name))?;
        output
            .id()
            .map(RestApiId::new)
            .ok_or_else(|| GatewayError::Provider(format!("created REST API {} has no id", spec.name)))
    }

    async fn get_resources(&self, id: &RestApiId) -> Result<Vec<GatewayResource>, GatewayError> {
        let mut resources = Vec::new();
        let mut position: Option<String> = None;
        loop {
            let output = self
                .gateway
                .get_resources()
                .rest_api_id(id.as_str())
                .embed("methods")
                .limit(PAGE_SIZE)
                .set_position(position.take())
                .send()
                .await
                .map_err(|e| map_gateway_error(e, id.as_str()))?;
            resources.extend(output.items().iter().filter_map(convert_resource));
            match output.position() {
                Some(next) if !next.is_empty() => position = Some(next.to_string()),
                _ => break,
            }
        }
        Ok(resources)
    }

    async fn create_resource(
        &self,
        api: &RestApiId,
        parent: &GatewayResourceId,
        path_part: &str,
    ) -> Result<GatewayResourceId, GatewayError> {
        let output = self
            .gateway
            .create_resource()
            .rest_api_id(api.as_str())
            .parent_id(parent.as_str())
            .path_part(path_part)
            .send()
            .await
            .map_err(|e| map_gateway_error(e, path_part))?;
        output
            .id()
            .map(GatewayResourceId::new)
            .ok_or_else(|| GatewayError::Provider(format!("created resource /{path_part} has no id")))
    }

    async fn put_method(
        &self,
        api: &RestApiId,
        resource: &GatewayResourceId,
        http_method: &str,
    ) -> Result<(), GatewayError> {
        self.gateway
            .put_method()
            .rest_api_id(api.as_str())
            .resource_id(resource.as_str())
            .http_method(http_method)
            .authorization_type(AUTHORIZATION_TYPE)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_gateway_error(e, resource.as_str()))
    }

    async fn put_integration(
        &self,
        api: &RestApiId,
        resource: &GatewayResourceId,
        integration: &IntegrationSpec,
    ) -> Result<(), GatewayError> {
        self.gateway
            .put_integration()
            .rest_api_id(api.as_str())
            .resource_id(resource.as_str())
            .http_method(&integration.http_method)
            .r#type(IntegrationType::AwsProxy)
            .integration_http_method(&integration.integration_http_method)
            .uri(&integration.uri)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_gateway_error(e, resource.as_str()))
    }

    async fn create_deployment(&self, api: &RestApiId, stage: &str) -> Result<(), GatewayError> {
        self.gateway
            .create_deployment()
            .rest_api_id(api.as_str())
            .stage_name(stage)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_gateway_error(e, api.as_str()))
    }
}
