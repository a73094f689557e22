// ABOUTME: Command module aggregator for the vsi CLI.
// ABOUTME: Re-exports config, status, and install command handlers.

mod config;
mod install;
mod provider_connection;
mod status;

pub use config::write_config;
pub use install::install;
pub use status::status;
