// ABOUTME: AWS SDK bindings for the cloud capability traits.
// ABOUTME: One shared SDK config; one client per service.

mod gateway;
mod iam;
mod lambda;
mod s3;
mod sts;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::config::{AwsAuth, AwsConfig};
use crate::error::Result;

const CREDENTIALS_PROVIDER: &str = "vsi-config";

/// Clients for every AWS service the installer touches.
#[derive(Clone)]
pub struct AwsClients {
    s3: aws_sdk_s3::Client,
    iam: aws_sdk_iam::Client,
    lambda: aws_sdk_lambda::Client,
    gateway: aws_sdk_apigateway::Client,
    sts: aws_sdk_sts::Client,
    zone: String,
}

impl std::fmt::Debug for AwsClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsClients")
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl AwsClients {
    /// Build clients for the configured region and credentials. No remote
    /// call is made until the first operation.
    pub async fn connect(config: &AwsConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.zone.clone()));

        loader = match config.auth()? {
            AwsAuth::StaticKeys {
                access_key_id,
                secret_access_key,
            } => loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                CREDENTIALS_PROVIDER,
            )),
            AwsAuth::Profile(name) => loader.profile_name(name),
            AwsAuth::DefaultChain => loader,
        };

        let sdk_config = loader.load().await;
        tracing::debug!(zone = %config.zone, "AWS clients configured");

        Ok(Self {
            s3: aws_sdk_s3::Client::new(&sdk_config),
            iam: aws_sdk_iam::Client::new(&sdk_config),
            lambda: aws_sdk_lambda::Client::new(&sdk_config),
            gateway: aws_sdk_apigateway::Client::new(&sdk_config),
            sts: aws_sdk_sts::Client::new(&sdk_config),
            zone: config.zone.clone(),
        })
    }
}

/// Full error chain of an SDK error, for messages that end up in status
/// causes.
fn describe<E: std::error::Error>(err: E) -> String {
    DisplayErrorContext(err).to_string()
}
