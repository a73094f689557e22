// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Enforces a non-empty Snowflake account list.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::SnowflakeConfig;

pub fn deserialize_accounts<'de, D>(deserializer: D) -> Result<NonEmpty<SnowflakeConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let accounts: Vec<SnowflakeConfig> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(accounts)
        .ok_or_else(|| serde::de::Error::custom("at least one Snowflake account is required"))
}
