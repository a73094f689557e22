// ABOUTME: SqlOps implementation over Snowflake's HTTP session and query endpoints.
// ABOUTME: Keeps one session token per account and logs in again once when it expires.

mod session;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::SnowflakeConfig;
use crate::error::{Error, Result};
use crate::provider::traits::{QueryResult, SqlError, SqlOps};
use session::{Envelope, LoginRequest, LoginResponse, QueryRequest, QueryResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for every configured Snowflake account.
pub struct SnowflakeClient {
    http: Client,
    /// Session token per account name.
    tokens: Mutex<HashMap<String, String>>,
}

impl SnowflakeClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Provider(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            tokens: Mutex::new(HashMap::new()),
        })
    }

    async fn token(&self, account: &SnowflakeConfig) -> std::result::Result<String, SqlError> {
        let mut tokens = self.tokens.lock().await;
        if let Some(token) = tokens.get(&account.account) {
            return Ok(token.clone());
        }
        let token = self.login(account).await?;
        tokens.insert(account.account.clone(), token.clone());
        Ok(token)
    }

    async fn forget_token(&self, account: &SnowflakeConfig) {
        self.tokens.lock().await.remove(&account.account);
    }

    async fn login(&self, account: &SnowflakeConfig) -> std::result::Result<String, SqlError> {
        tracing::debug!(account = %account.account, user = %account.username, "logging in to Snowflake");
        let response = self
            .http
            .post(session::login_url(account))
            .header(ACCEPT, "application/json")
            .json(&LoginRequest::new(account))
            .send()
            .await
            .map_err(|e| connection_error(account, e))?;
        let envelope: Envelope<LoginResponse> = response
            .json()
            .await
            .map_err(|e| connection_error(account, e))?;

        match envelope.data {
            Some(data) if envelope.success => Ok(data.token),
            _ => Err(SqlError::Authentication {
                account: account.account.clone(),
                message: format!("{} ({})", envelope.message(), envelope.code()),
            }),
        }
    }

    async fn query(
        &self,
        account: &SnowflakeConfig,
        token: &str,
        statement: &str,
    ) -> std::result::Result<Envelope<QueryResponse>, SqlError> {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(account = %account.account, %request_id, statement, "executing statement");
        let response = self
            .http
            .post(session::query_url(&account.account, &request_id))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, session::authorization(token))
            .json(&QueryRequest {
                sql_text: statement,
                async_exec: false,
                sequence_id: 1,
            })
            .send()
            .await
            .map_err(|e| connection_error(account, e))?;
        response
            .json()
            .await
            .map_err(|e| connection_error(account, e))
    }
}

fn connection_error(account: &SnowflakeConfig, err: reqwest::Error) -> SqlError {
    SqlError::Connection {
        account: account.account.clone(),
        message: err.to_string(),
    }
}

#[async_trait]
impl SqlOps for SnowflakeClient {
    async fn execute(
        &self,
        account: &SnowflakeConfig,
        statement: &str,
    ) -> std::result::Result<QueryResult, SqlError> {
        let token = self.token(account).await?;
        let mut envelope = self.query(account, &token, statement).await?;

        if !envelope.success && envelope.code() == session::SESSION_EXPIRED {
            tracing::debug!(account = %account.account, "session expired, logging in again");
            self.forget_token(account).await;
            let token = self.token(account).await?;
            envelope = self.query(account, &token, statement).await?;
        }

        if !envelope.success {
            return Err(SqlError::Statement {
                code: envelope.code().to_string(),
                message: envelope.message().to_string(),
            });
        }
        Ok(envelope.data.map(QueryResult::from).unwrap_or_default())
    }
}
