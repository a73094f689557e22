// ABOUTME: Serverless function operations trait (Lambda-like).
// ABOUTME: Get, create, delete functions and grant invoke permissions.

use super::shared_types::{FunctionSpec, InvokePermission};
use async_trait::async_trait;

/// Function lifecycle operations.
#[async_trait]
pub trait LambdaOps: Send + Sync {
    /// Check that a function exists and is not in a failed state.
    async fn get_function(&self, name: &str) -> Result<(), LambdaError>;

    /// Create a function, returning its ARN.
    async fn create_function(&self, spec: &FunctionSpec) -> Result<String, LambdaError>;

    /// Delete a function.
    async fn delete_function(&self, name: &str) -> Result<(), LambdaError>;

    /// Add a resource-based permission statement to a function.
    async fn add_permission(&self, permission: &InvokePermission) -> Result<(), LambdaError>;
}

/// Errors from function operations.
#[derive(Debug, thiserror::Error)]
pub enum LambdaError {
    #[error("function not found: {0}")]
    NotFound(String),

    /// Function or permission statement already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Function exists but reports a failed state.
    #[error("function unhealthy: {0}")]
    Unhealthy(String),

    #[error("lambda error: {0}")]
    Provider(String),
}
