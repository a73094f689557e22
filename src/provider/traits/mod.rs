// ABOUTME: Composable capability traits for the cloud providers.
// ABOUTME: Defines ObjectStore, IamOps, LambdaOps, GatewayOps, IdentityOps, SqlOps.

mod gateway;
mod iam;
mod identity;
mod lambda;
mod object_store;
mod shared_types;
mod sql;

pub use gateway::{GatewayError, GatewayOps};
pub use iam::{IamError, IamOps};
pub use identity::{IdentityError, IdentityOps};
pub use lambda::{LambdaError, LambdaOps};
pub use object_store::{ObjectStore, ObjectStoreError};
pub use shared_types::*;
pub use sql::{SqlError, SqlOps};

/// Every AWS capability the installer needs.
///
/// This is automatically implemented for any type that implements all
/// individual AWS traits.
pub trait CloudOps: ObjectStore + IamOps + LambdaOps + GatewayOps + IdentityOps {}

impl<T> CloudOps for T where T: ObjectStore + IamOps + LambdaOps + GatewayOps + IdentityOps {}
