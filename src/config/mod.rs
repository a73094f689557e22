// ABOUTME: Configuration types and parsing for ~/.vsi/config.yaml.
// ABOUTME: Handles YAML parsing, default path resolution, and validation.

mod aws;
mod deserialize;
mod init;
mod lambda;
mod snowflake;
mod venafi;

pub use aws::{AwsAuth, AwsConfig};
pub use init::{InitOptions, init_config};
pub use lambda::LambdaConfig;
pub use snowflake::SnowflakeConfig;
pub use venafi::{CREDENTIALS_KEY, VenafiConfig, credentials_seed};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use deserialize::deserialize_accounts;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".vsi";
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Desired state for one deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,

    #[serde(deserialize_with = "deserialize_accounts")]
    pub snowflake: NonEmpty<SnowflakeConfig>,

    #[serde(default)]
    pub venafi: Vec<VenafiConfig>,

    #[serde(default)]
    pub lambda: LambdaConfig,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, resolving a relative handler package path against
    /// the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(dir) = path.parent() {
            config.lambda.resolve_package(dir);
        }
        tracing::debug!(path = %path.display(), accounts = config.snowflake.len(), "loaded config");
        Ok(config)
    }

    /// `~/.vsi/config.yaml`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILENAME))
            .ok_or(Error::NoHomeDir)
    }

    /// Explicit path if given, otherwise the default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.aws.zone.trim().is_empty() {
            return Err(Error::InvalidConfig("aws.zone must not be empty".into()));
        }
        if self.aws.bucket.trim().is_empty() {
            return Err(Error::InvalidConfig("aws.bucket must not be empty".into()));
        }
        self.aws.auth()?;
        for account in self.snowflake.iter() {
            if account.account.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "snowflake.account must not be empty".into(),
                ));
            }
        }
        if self.retry.attempts == 0 {
            return Err(Error::InvalidConfig("retry.attempts must be at least 1".into()));
        }
        Ok(())
    }
}
