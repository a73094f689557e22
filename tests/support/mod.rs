// ABOUTME: Test support utilities.
// ABOUTME: Provides the in-memory provider fakes and config fixtures.

use std::sync::Once;
use vsi::config::Config;
use vsi::install::HandlerPackage;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_cloud;

pub const BUCKET: &str = "venafi-test-bucket";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("vsi=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Config for one region with the given Snowflake accounts.
#[allow(dead_code)]
pub fn config_with_accounts(accounts: &[&str]) -> Config {
    let mut yaml = format!(
        r#"
aws:
  zone: eu-west-1
  bucket: {BUCKET}
  accessKeyID: AKIATEST
  accessKey: secret
venafi:
  - url: https://tpp.example.com
    accessToken: token
    accessTokenExpires: "2030-01-01T00:00:00Z"
    refreshToken: refresh
retry:
  attempts: 3
  initialDelay: 10ms
snowflake:
"#
    );
    for account in accounts {
        yaml.push_str(&format!(
            "  - account: {account}\n    username: installer\n    password: pw\n    role: ACCOUNTADMIN\n    warehouse: COMPUTE_WH\n    database: VENAFI\n    schema: PUBLIC\n"
        ));
    }
    Config::from_yaml(&yaml).unwrap()
}

#[allow(dead_code)]
pub fn config() -> Config {
    config_with_accounts(&["xy12345"])
}

/// A package that passes the zip signature check.
#[allow(dead_code)]
pub fn package() -> HandlerPackage {
    HandlerPackage::from_bytes(b"PK\x03\x04handlers".to_vec())
}
