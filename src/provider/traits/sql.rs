// ABOUTME: SQL execution trait for Snowflake accounts.
// ABOUTME: One statement at a time, results returned as text rows.

use super::shared_types::QueryResult;
use crate::config::SnowflakeConfig;
use async_trait::async_trait;

/// Statement execution against a configured Snowflake account.
#[async_trait]
pub trait SqlOps: Send + Sync {
    /// Run one statement in the account's configured role, warehouse,
    /// database, and schema.
    async fn execute(
        &self,
        account: &SnowflakeConfig,
        statement: &str,
    ) -> Result<QueryResult, SqlError>;

    /// Open (or reuse) a session and run a trivial statement.
    async fn ping(&self, account: &SnowflakeConfig) -> Result<(), SqlError> {
        self.execute(account, "select 1").await.map(|_| ())
    }
}

/// Errors from SQL execution.
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    #[error("login failed for {account}: {message}")]
    Authentication { account: String, message: String },

    #[error("connection to {account} failed: {message}")]
    Connection { account: String, message: String },

    #[error("statement failed ({code}): {message}")]
    Statement { code: String, message: String },
}
