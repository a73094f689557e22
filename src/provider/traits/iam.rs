// ABOUTME: Identity and access management operations trait (IAM-like).
// ABOUTME: Roles, customer-managed policies, attachments, and trust policies.

use async_trait::async_trait;

/// Role and policy operations.
#[async_trait]
pub trait IamOps: Send + Sync {
    /// Check that a role exists.
    async fn get_role(&self, name: &str) -> Result<(), IamError>;

    /// Create a role with the given trust (assume-role) policy document.
    async fn create_role(
        &self,
        name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<(), IamError>;

    /// Replace a role's trust policy document.
    async fn update_assume_role_policy(&self, name: &str, policy: &str) -> Result<(), IamError>;

    /// Check that a customer-managed policy exists.
    async fn get_policy(&self, arn: &str) -> Result<(), IamError>;

    /// Create a customer-managed policy, returning its ARN.
    async fn create_policy(&self, name: &str, document: &str) -> Result<String, IamError>;

    /// Attach a managed policy to a role. Attaching twice is a no-op.
    async fn attach_role_policy(&self, role: &str, policy_arn: &str) -> Result<(), IamError>;
}

/// Errors from IAM operations.
#[derive(Debug, thiserror::Error)]
pub enum IamError {
    #[error("IAM entity not found: {0}")]
    NotFound(String),

    #[error("IAM entity already exists: {0}")]
    AlreadyExists(String),

    #[error("IAM error: {0}")]
    Provider(String),
}
