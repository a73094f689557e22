// ABOUTME: Health model and status aggregation for the deployment.
// ABOUTME: Re-exports StatusResult, folding, the snapshot, and the printer.

mod aggregate;
mod check_state;
mod report;
mod result;
mod service;

pub use aggregate::check_status;
pub use check_state::{FunctionCheckState, fold};
pub use report::render;
pub use result::{Cause, StatusCode, StatusResult};
pub use service::{FunctionStatuses, ServiceStatus, SnowflakeAccountStatus};
