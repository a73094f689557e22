// ABOUTME: Config command implementation.
// ABOUTME: Writes a starter config file from command-line values.

use std::path::Path;
use vsi::config::{InitOptions, init_config};
use vsi::error::Result;
use vsi::output::Output;

pub fn write_config(path: &Path, options: &InitOptions, force: bool, output: &Output) -> Result<()> {
    init_config(path, options, force)?;
    output.success(&format!("Wrote {}", path.display()));
    output.progress("Fill in the snowflake and venafi sections before running install.");
    Ok(())
}
