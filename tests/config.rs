// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, credential source selection, and path resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;
use vsi::config::*;
use vsi::error::Error;
use vsi::retry::RetryPolicy;

const ACCOUNT: &str = r#"
snowflake:
  - account: xy12345.eu-west-1
    username: installer
    password: sf-secret
    role: ACCOUNTADMIN
    warehouse: COMPUTE_WH
    database: VENAFI
    schema: PUBLIC
"#;

fn with_aws(aws: &str) -> String {
    format!("aws:\n{aws}{ACCOUNT}")
}

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
aws:
  zone: us-east-2
  bucket: venafi-creds
  profile: venafi
snowflake:
  - account: xy12345
    username: installer
    password: pw
    role: ACCOUNTADMIN
    warehouse: COMPUTE_WH
    database: VENAFI
    schema: PUBLIC
  - account: ab67890
    username: other
    password: pw2
    role: SYSADMIN
    warehouse: WH
    database: DB
    schema: S
venafi:
  - url: https://tpp1.example.com
    accessToken: t1
    accessTokenExpires: "2030-01-01T00:00:00Z"
    refreshToken: r1
  - url: https://tpp2.example.com
    accessToken: t2
lambda:
  package: /opt/vsi/handlers.zip
  runtime: provided.al2
  timeout: 1m
retry:
  attempts: 7
  initialDelay: 500ms
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.aws.zone, "us-east-2");
        assert_eq!(config.aws.bucket, "venafi-creds");
        assert_eq!(config.aws.auth().unwrap(), AwsAuth::Profile("venafi".into()));
        assert_eq!(config.snowflake.len(), 2);
        assert_eq!(config.snowflake.head.account, "xy12345");
        assert_eq!(config.snowflake.tail[0].role, "SYSADMIN");
        assert_eq!(config.venafi.len(), 2);
        assert!(config.venafi[1].refresh_token.is_empty());
        assert_eq!(config.lambda.package, PathBuf::from("/opt/vsi/handlers.zip"));
        assert_eq!(config.lambda.runtime, "provided.al2");
        assert_eq!(config.lambda.timeout, Duration::from_secs(60));
        assert_eq!(
            config.retry,
            RetryPolicy::new(7, Duration::from_millis(500))
        );
    }

    #[test]
    fn missing_aws_section_returns_error() {
        let err = Config::from_yaml(ACCOUNT).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)), "{err}");
    }

    #[test]
    fn missing_snowflake_section_returns_error() {
        let yaml = "aws:\n  zone: eu-west-1\n  bucket: b\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn venafi_keys_accept_lowercase_aliases() {
        let yaml = format!(
            "{}venafi:\n  - URL: https://tpp\n    accesstoken: t\n    refreshtoken: r\n",
            with_aws("  zone: eu-west-1\n  bucket: b\n")
        );
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.venafi[0].url, "https://tpp");
        assert_eq!(config.venafi[0].access_token, "t");
        assert_eq!(config.venafi[0].refresh_token, "r");
    }
}

mod credentials {
    use super::*;

    #[test]
    fn static_keys_are_used_when_both_set() {
        let config = Config::from_yaml(&with_aws(
            "  zone: eu-west-1\n  bucket: b\n  accessKeyID: AKIA\n  accessKey: secret\n",
        ))
        .unwrap();
        assert_eq!(
            config.aws.auth().unwrap(),
            AwsAuth::StaticKeys {
                access_key_id: "AKIA".into(),
                secret_access_key: "secret".into(),
            }
        );
    }

    #[test]
    fn no_credentials_falls_back_to_default_chain() {
        let config = Config::from_yaml(&with_aws("  zone: eu-west-1\n  bucket: b\n")).unwrap();
        assert_eq!(config.aws.auth().unwrap(), AwsAuth::DefaultChain);
    }

    #[test]
    fn half_a_key_pair_is_rejected() {
        let err = Config::from_yaml(&with_aws(
            "  zone: eu-west-1\n  bucket: b\n  accessKeyID: AKIA\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("must be set together"), "{err}");
    }

    #[test]
    fn keys_and_profile_together_are_rejected() {
        let err = Config::from_yaml(&with_aws(
            "  zone: eu-west-1\n  bucket: b\n  accessKeyID: AKIA\n  accessKey: s\n  profile: p\n",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_yaml(&with_aws(
            "  zone: eu-west-1\n  bucket: b\n  accessKeyID: AKIA\n  accessKey: topsecret\n",
        ))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("sf-secret"));
    }
}

mod validation {
    use super::*;

    #[test]
    fn blank_zone_is_rejected() {
        let err = Config::from_yaml(&with_aws("  zone: \"  \"\n  bucket: b\n")).unwrap_err();
        assert!(err.to_string().contains("aws.zone"), "{err}");
    }

    #[test]
    fn blank_account_is_rejected() {
        let yaml = with_aws("  zone: eu-west-1\n  bucket: b\n")
            .replace("account: xy12345.eu-west-1", "account: \"\"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("snowflake.account"), "{err}");
    }

    #[test]
    fn empty_account_list_is_rejected() {
        let yaml = "aws:\n  zone: eu-west-1\n  bucket: b\nsnowflake: []\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one Snowflake account"));
    }
}

mod paths {
    use super::*;

    #[test]
    fn default_path_is_under_home() {
        let home = tempfile::tempdir().unwrap();
        temp_env::with_var("HOME", Some(home.path()), || {
            let path = Config::default_path().unwrap();
            assert_eq!(path, home.path().join(".vsi").join("config.yaml"));
        });
    }

    #[test]
    fn explicit_path_wins() {
        let path = Config::resolve_path(Some(Path::new("/etc/vsi.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/vsi.yaml"));
    }

    #[test]
    fn load_resolves_relative_package_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = format!(
            "{}lambda:\n  package: build/handlers.zip\n",
            with_aws("  zone: eu-west-1\n  bucket: b\n")
        );
        std::fs::write(&path, yaml).unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.lambda.package, dir.path().join("build/handlers.zip"));
    }

    #[test]
    fn init_then_load_round_trips_cli_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let options = InitOptions {
            access_key_id: Some("AKIA".into()),
            access_key: Some("secret".into()),
            zone: Some("ap-south-1".into()),
            bucket: Some("vsi-bucket".into()),
            ..Default::default()
        };

        init_config(&path, &options, false).unwrap();
        let config = Config::load(&path).unwrap();

        assert_eq!(config.aws.zone, "ap-south-1");
        assert_eq!(config.aws.bucket, "vsi-bucket");
        assert!(matches!(config.aws.auth().unwrap(), AwsAuth::StaticKeys { .. }));
    }

    #[test]
    fn init_rejects_profile_with_keys() {
        let dir = tempfile::tempdir().unwrap();
        let options = InitOptions {
            access_key_id: Some("AKIA".into()),
            profile: Some("p".into()),
            ..Default::default()
        };
        let err = init_config(&dir.path().join("c.yaml"), &options, false).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
