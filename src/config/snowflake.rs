// ABOUTME: Connection settings for one Snowflake account.
// ABOUTME: Password is redacted from Debug output.

use serde::Deserialize;
use std::fmt;

#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct SnowflakeConfig {
    pub account: String,

    #[serde(alias = "user")]
    pub username: String,

    pub password: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub warehouse: String,

    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub schema: String,
}

impl fmt::Debug for SnowflakeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeConfig")
            .field("account", &self.account)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
