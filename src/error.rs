// ABOUTME: Application-wide error types for vsi.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::install::InstallError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("cannot locate home directory for the default config path")]
    NoHomeDir,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("provider setup failed: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, Error>;
