// ABOUTME: Install error types with SNAFU pattern.
// ABOUTME: Each variant names the stage and resource that failed.

use snafu::Snafu;
use std::path::PathBuf;

use crate::deployment_info::DeploymentInfoError;
use crate::provider::{GatewayError, IamError, IdentityError, LambdaError, ObjectStoreError};
use crate::snowflake::SnowflakeError;
use crate::status::ServiceStatus;

/// Fatal condition that stopped an install run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum InstallError {
    #[snafu(display("cannot use AWS: {reason}"))]
    Preflight {
        reason: String,
        status: Box<ServiceStatus>,
    },

    #[snafu(display("failed to resolve AWS account: {source}"))]
    Identity { source: IdentityError },

    #[snafu(display("failed to create bucket {bucket}: {source}"))]
    Bucket {
        bucket: String,
        source: ObjectStoreError,
    },

    #[snafu(display("bucket {bucket} is not usable: {reason}"))]
    BucketUnusable { bucket: String, reason: String },

    #[snafu(display("failed to encode credential file: {source}"))]
    SeedEncode { source: serde_json::Error },

    #[snafu(display("failed to upload credential file: {source}"))]
    Credentials { source: ObjectStoreError },

    #[snafu(display("deployment info: {source}"))]
    DeploymentInfo { source: DeploymentInfoError },

    #[snafu(display("failed to configure {resource}: {source}"))]
    Roles { resource: String, source: IamError },

    #[snafu(display("failed to set up API gateway: {source}"))]
    Gateway { source: GatewayError },

    #[snafu(display("cannot read handler package {}: {source}", path.display()))]
    Package {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("handler package {} is not a zip archive", path.display()))]
    InvalidPackage { path: PathBuf },

    #[snafu(display("failed to deploy function {function}: {source}"))]
    Lambda {
        function: String,
        source: LambdaError,
    },

    #[snafu(display("failed to wire function {function} into the gateway: {source}"))]
    Integration {
        function: String,
        source: GatewayError,
    },

    #[snafu(display("failed to configure Snowflake account {account}: {source}"))]
    Snowflake {
        account: String,
        source: SnowflakeError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallErrorKind {
    /// AWS connectivity or credentials not verified; nothing was written.
    Preflight,
    /// Local input (handler package, credential seed) is unusable.
    LocalInput,
    /// The deployment record could not be read or written.
    DeploymentInfo,
    /// A create, replace, or delete call against AWS or Snowflake failed.
    RemoteWrite,
}

impl InstallError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> InstallErrorKind {
        match self {
            InstallError::Preflight { .. } => InstallErrorKind::Preflight,
            InstallError::Package { .. }
            | InstallError::InvalidPackage { .. }
            | InstallError::SeedEncode { .. } => InstallErrorKind::LocalInput,
            InstallError::DeploymentInfo { .. } => InstallErrorKind::DeploymentInfo,
            InstallError::Identity { .. }
            | InstallError::Bucket { .. }
            | InstallError::BucketUnusable { .. }
            | InstallError::Credentials { .. }
            | InstallError::Roles { .. }
            | InstallError::Gateway { .. }
            | InstallError::Lambda { .. }
            | InstallError::Integration { .. }
            | InstallError::Snowflake { .. } => InstallErrorKind::RemoteWrite,
        }
    }

    /// Snapshot taken before the run, when the run stopped at preflight.
    pub fn preflight_status(&self) -> Option<&ServiceStatus> {
        match self {
            InstallError::Preflight { status, .. } => Some(status.as_ref()),
            _ => None,
        }
    }
}
