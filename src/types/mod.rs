// ABOUTME: Domain types shared by probes, status aggregation, and the installer.
// ABOUTME: Exports the connector function catalogue, typed IDs, and ARN builders.

pub mod arn;
mod function;
mod id;

pub use function::{ConnectorFunction, LAMBDA_NAME_PREFIX};
pub use id::{GatewayResourceId, GatewayResourceMarker, Id, RestApiId, RestApiMarker};
