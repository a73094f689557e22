// ABOUTME: IdentityOps implementation on the STS SDK client.
// ABOUTME: GetCallerIdentity supplies the account id for ARNs.

use async_trait::async_trait;

use super::{AwsClients, describe};
use crate::provider::traits::{IdentityError, IdentityOps};

#[async_trait]
impl IdentityOps for AwsClients {
    async fn account_id(&self) -> Result<String, IdentityError> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| IdentityError::Provider(describe(e)))?;
        output
            .account()
            .map(str::to_string)
            .ok_or(IdentityError::MissingAccount)
    }
}
