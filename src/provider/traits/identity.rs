// ABOUTME: Caller identity trait (STS-like).
// ABOUTME: Resolves the AWS account id that scopes every ARN.

use async_trait::async_trait;

#[async_trait]
pub trait IdentityOps: Send + Sync {
    /// Account id of the credentials in use.
    async fn account_id(&self) -> Result<String, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("caller identity has no account id")]
    MissingAccount,

    #[error("identity error: {0}")]
    Provider(String),
}
