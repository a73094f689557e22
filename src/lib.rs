// ABOUTME: Library root for vsi - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deployment_info;
pub mod diagnostics;
pub mod error;
pub mod install;
pub mod output;
pub mod probe;
pub mod provider;
pub mod retry;
pub mod snowflake;
pub mod status;
pub mod types;
