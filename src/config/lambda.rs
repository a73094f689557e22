// ABOUTME: Settings for the Lambda functions: handler package, runtime, timeout.
// ABOUTME: The package path is resolved relative to the config file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PACKAGE: &str = "handlers.zip";
pub const DEFAULT_RUNTIME: &str = "provided.al2023";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LambdaConfig {
    #[serde(default = "default_package")]
    pub package: PathBuf,

    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_package() -> PathBuf {
    PathBuf::from(DEFAULT_PACKAGE)
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            runtime: default_runtime(),
            timeout: default_timeout(),
        }
    }
}

impl LambdaConfig {
    pub(super) fn resolve_package(&mut self, config_dir: &Path) {
        if self.package.is_relative() {
            self.package = config_dir.join(&self.package);
        }
    }
}
