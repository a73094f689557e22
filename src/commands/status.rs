// ABOUTME: Status command implementation.
// ABOUTME: Prints the health snapshot; always succeeds once the snapshot is taken.

use super::provider_connection::connect_providers;
use vsi::config::Config;
use vsi::error::Result;
use vsi::output::Output;
use vsi::status::{check_status, render};

/// Check every managed resource and print the result.
///
/// Missing and broken resources are reported, not treated as failures.
pub async fn status(config: Config, output: Output) -> Result<()> {
    let providers = connect_providers(&config, &output).await?;

    let status = check_status(&config, &providers.cloud, &providers.sql).await;
    output.report(&render(&status), &status);

    if status.fully_deployed() {
        output.progress("All resources healthy.");
    } else {
        output.progress("Run `vsi install` to create or repair the resources above.");
    }
    Ok(())
}
