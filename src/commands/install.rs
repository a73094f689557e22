// ABOUTME: Install command implementation.
// ABOUTME: Runs the reconciler and prints the status snapshot when it stops early.

use super::provider_connection::connect_providers;
use vsi::config::Config;
use vsi::error::Result;
use vsi::install::{InstallErrorKind, Installer, Stage};
use vsi::output::Output;
use vsi::status::{check_status, render};

pub async fn install(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let providers = connect_providers(&config, &output).await?;

    let result = Installer::new(&config, &providers.cloud, &providers.sql, &output)
        .run()
        .await;

    match result {
        Ok(report) => {
            if report.unchanged() {
                output.progress("Nothing to do, every resource was already in place.");
            } else {
                let stages: Vec<&str> = report.stages.iter().map(Stage::label).collect();
                output.progress(&format!("Changed: {}", stages.join(", ")));
            }
            Ok(())
        }
        Err(e) => {
            // Show where things stand so the operator can see what is left.
            let status = match e.preflight_status() {
                Some(status) => status.clone(),
                None => check_status(&config, &providers.cloud, &providers.sql).await,
            };
            output.report(&render(&status), &status);
            if e.kind() == InstallErrorKind::RemoteWrite {
                output.progress("Work done so far is kept; run install again after fixing the cause.");
            }
            Err(e.into())
        }
    }
}
