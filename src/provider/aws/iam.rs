// ABOUTME: IamOps implementation on the IAM SDK client.
// ABOUTME: NoSuchEntity and EntityAlreadyExists map to the trait's flavors.

use async_trait::async_trait;
use aws_sdk_iam::error::{ProvideErrorMetadata, SdkError};

use super::{AwsClients, describe};
use crate::provider::traits::{IamError, IamOps};

fn map_iam_error<E, R>(err: SdkError<E, R>, entity: &str) -> IamError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("NoSuchEntity") => IamError::NotFound(entity.to_string()),
        Some("EntityAlreadyExists") => IamError::AlreadyExists(entity.to_string()),
        _ => IamError::Provider(describe(err)),
    }
}

#[async_trait]
impl IamOps for AwsClients {
    async fn get_role(&self, name: &str) -> Result<(), IamError> {
        self.iam
            .get_role()
            .role_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_iam_error(e, name))
    }

    async fn create_role(
        &self,
        name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<(), IamError> {
        self.iam
            .create_role()
            .role_name(name)
            .assume_role_policy_document(trust_policy)
            .description(description)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_iam_error(e, name))
    }

    async fn update_assume_role_policy(&self, name: &str, policy: &str) -> Result<(), IamError> {
        self.iam
            .update_assume_role_policy()
            .role_name(name)
            .policy_document(policy)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_iam_error(e, name))
    }

    async fn get_policy(&self, arn: &str) -> Result<(), IamError> {
        self.iam
            .get_policy()
            .policy_arn(arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_iam_error(e, arn))
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<String, IamError> {
        let output = self
            .iam
            .create_policy()
            .policy_name(name)
            .policy_document(document)
            .send()
            .await
            .map_err(|e| map_iam_error(e, name))?;
        output
            .policy()
            .and_then(|policy| policy.arn())
            .map(str::to_string)
            .ok_or_else(|| IamError::Provider(format!("created policy {name} has no ARN")))
    }

    async fn attach_role_policy(&self, role: &str, policy_arn: &str) -> Result<(), IamError> {
        self.iam
            .attach_role_policy()
            .role_name(role)
            .policy_arn(policy_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_iam_error(e, role))
    }
}
