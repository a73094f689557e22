// ABOUTME: Config scaffolding for new installations.
// ABOUTME: Writes a config.yaml template filled from command-line values.

use std::path::Path;

use crate::error::{Error, Result};

use super::lambda::{DEFAULT_PACKAGE, DEFAULT_RUNTIME};

/// Values supplied on the command line; anything unset becomes a placeholder.
#[derive(Debug, Default, Clone)]
pub struct InitOptions {
    pub access_key_id: Option<String>,
    pub access_key: Option<String>,
    pub profile: Option<String>,
    pub zone: Option<String>,
    pub bucket: Option<String>,
}

pub fn init_config(path: &Path, options: &InitOptions, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    if options.profile.is_some() && (options.access_key_id.is_some() || options.access_key.is_some()) {
        return Err(Error::InvalidConfig(
            "use either --profile or --access-key-id/--access-key, not both".into(),
        ));
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    std::fs::write(path, generate_template_yaml(options))?;
    tracing::debug!(path = %path.display(), "wrote config template");
    Ok(())
}

fn generate_template_yaml(options: &InitOptions) -> String {
    let credentials = match &options.profile {
        Some(profile) => format!("  profile: {}\n", profile),
        None => format!(
            "  accessKeyID: {}\n  accessKey: {}\n",
            options.access_key_id.as_deref().unwrap_or("<access key id>"),
            options.access_key.as_deref().unwrap_or("<secret access key>")
        ),
    };

    format!(
        r#"aws:
  zone: {}
  bucket: {}
{}snowflake:
  - account: <account identifier>
    username: <user>
    password: <password>
    role: ACCOUNTADMIN
    warehouse: COMPUTE_WH
    database: <database>
    schema: PUBLIC
venafi:
  - url: https://tpp.example.com
    accessToken: <access token>
    accessTokenExpires: <expiry>
    refreshToken: <refresh token>
lambda:
  package: {}
  runtime: {}
  timeout: 30s
"#,
        options.zone.as_deref().unwrap_or("eu-west-1"),
        options.bucket.as_deref().unwrap_or("venafi-credentials"),
        credentials,
        DEFAULT_PACKAGE,
        DEFAULT_RUNTIME,
    )
}
