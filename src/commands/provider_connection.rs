// ABOUTME: Shared helper for building the AWS and Snowflake provider clients.
// ABOUTME: Used by both the status and install commands.

use vsi::config::Config;
use vsi::error::Result;
use vsi::output::Output;
use vsi::provider::{AwsClients, SnowflakeClient};

/// Provider clients for one run.
pub struct Providers {
    pub cloud: AwsClients,
    pub sql: SnowflakeClient,
}

/// Build clients for the configured AWS region and Snowflake accounts.
///
/// Nothing is contacted yet; connectivity problems surface in the first
/// probe, where they are classified instead of aborting the command.
pub async fn connect_providers(config: &Config, output: &Output) -> Result<Providers> {
    output.progress(&format!(
        "Using AWS region {} and {} Snowflake account(s)",
        config.aws.zone,
        config.snowflake.len()
    ));
    let cloud = AwsClients::connect(&config.aws).await?;
    let sql = SnowflakeClient::new()?;
    Ok(Providers { cloud, sql })
}
