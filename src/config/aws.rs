// ABOUTME: AWS target configuration: region, bucket, and how to authenticate.
// ABOUTME: Static access keys or a named profile, falling back to the default chain.

use serde::Deserialize;
use std::fmt;

use crate::error::{Error, Result};

#[derive(Clone, Deserialize)]
pub struct AwsConfig {
    pub zone: String,

    pub bucket: String,

    #[serde(default, rename = "accessKeyID", alias = "accessKeyId", alias = "accesskeyid")]
    pub access_key_id: Option<String>,

    #[serde(default, rename = "accessKey", alias = "accesskey")]
    pub access_key: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,
}

/// How the AWS clients obtain credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum AwsAuth {
    StaticKeys {
        access_key_id: String,
        secret_access_key: String,
    },
    Profile(String),
    DefaultChain,
}

impl AwsConfig {
    /// Credential source implied by the configured fields.
    pub fn auth(&self) -> Result<AwsAuth> {
        let key_id = self.access_key_id.as_deref().filter(|s| !s.is_empty());
        let secret = self.access_key.as_deref().filter(|s| !s.is_empty());
        let profile = self.profile.as_deref().filter(|s| !s.is_empty());

        match (key_id, secret, profile) {
            (Some(_), Some(_), Some(_)) => Err(Error::InvalidConfig(
                "aws: set either accessKeyID/accessKey or profile, not both".into(),
            )),
            (Some(id), Some(secret), None) => Ok(AwsAuth::StaticKeys {
                access_key_id: id.to_string(),
                secret_access_key: secret.to_string(),
            }),
            (Some(_), None, _) | (None, Some(_), _) => Err(Error::InvalidConfig(
                "aws: accessKeyID and accessKey must be set together".into(),
            )),
            (None, None, Some(profile)) => Ok(AwsAuth::Profile(profile.to_string())),
            (None, None, None) => Ok(AwsAuth::DefaultChain),
        }
    }
}

// Keep secrets out of debug logs.
impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("zone", &self.zone)
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("profile", &self.profile)
            .finish()
    }
}

impl fmt::Debug for AwsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwsAuth::StaticKeys { access_key_id, .. } => f
                .debug_struct("StaticKeys")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
            AwsAuth::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            AwsAuth::DefaultChain => f.write_str("DefaultChain"),
        }
    }
}
