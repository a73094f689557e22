// ABOUTME: HTTP API gateway operations trait (API Gateway REST-like).
// ABOUTME: REST APIs, resources, methods, integrations, and stage deployments.

use super::shared_types::{GatewayResource, IntegrationSpec, RestApiSpec};
use crate::types::{GatewayResourceId, RestApiId};
use async_trait::async_trait;

/// REST API operations.
#[async_trait]
pub trait GatewayOps: Send + Sync {
    /// Check that a REST API exists.
    async fn get_rest_api(&self, id: &RestApiId) -> Result<(), GatewayError>;

    /// Create a regional REST API.
    async fn create_rest_api(&self, spec: &RestApiSpec) -> Result<RestApiId, GatewayError>;

    /// List every resource of a REST API, root included.
    async fn get_resources(&self, id: &RestApiId) -> Result<Vec<GatewayResource>, GatewayError>;

    /// Create a child resource under `parent`.
    async fn create_resource(
        &self,
        api: &RestApiId,
        parent: &GatewayResourceId,
        path_part: &str,
    ) -> Result<GatewayResourceId, GatewayError>;

    /// Add an IAM-authorized method to a resource.
    async fn put_method(
        &self,
        api: &RestApiId,
        resource: &GatewayResourceId,
        http_method: &str,
    ) -> Result<(), GatewayError>;

    /// Set (or replace) the backend integration of a method.
    async fn put_integration(
        &self,
        api: &RestApiId,
        resource: &GatewayResourceId,
        integration: &IntegrationSpec,
    ) -> Result<(), GatewayError>;

    /// Deploy the current configuration to a named stage.
    async fn create_deployment(&self, api: &RestApiId, stage: &str) -> Result<(), GatewayError>;
}

/// Errors from gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway entity not found: {0}")]
    NotFound(String),

    #[error("gateway conflict: {0}")]
    Conflict(String),

    #[error("gateway error: {0}")]
    Provider(String),
}
