// ABOUTME: Wire types for Snowflake's session login and query endpoints.
// ABOUTME: Both endpoints wrap their payload in a {success, code, message, data} envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SnowflakeConfig;
use crate::provider::traits::QueryResult;

/// Error code Snowflake returns when a session token has expired.
pub const SESSION_EXPIRED: &str = "390112";

const CLIENT_APP_ID: &str = "vsi";

/// `https://<account>.snowflakecomputing.com`
pub fn base_url(account: &str) -> String {
    format!("https://{}.snowflakecomputing.com", account.to_ascii_lowercase())
}

/// Login URL carrying the session's role, warehouse, database, and schema.
pub fn login_url(account: &SnowflakeConfig) -> String {
    let params = [
        ("roleName", account.role.as_str()),
        ("warehouse", account.warehouse.as_str()),
        ("databaseName", account.database.as_str()),
        ("schemaName", account.schema.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
    .collect::<Vec<_>>();

    let mut url = format!("{}/session/v1/login-request", base_url(&account.account));
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

pub fn query_url(account: &str, request_id: &uuid::Uuid) -> String {
    format!(
        "{}/queries/v1/query-request?requestId={request_id}",
        base_url(account)
    )
}

pub fn authorization(token: &str) -> String {
    format!("Snowflake Token=\"{token}\"")
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub data: LoginData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LoginData<'a> {
    pub account_name: &'a str,
    pub login_name: &'a str,
    pub password: &'a str,
    pub client_app_id: &'a str,
    pub client_app_version: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(account: &'a SnowflakeConfig) -> Self {
        // Locator only; any region suffix belongs to the host name.
        let account_name = account
            .account
            .split('.')
            .next()
            .unwrap_or(account.account.as_str());
        Self {
            data: LoginData {
                account_name,
                login_name: &account.username,
                password: &account.password,
                client_app_id: CLIENT_APP_ID,
                client_app_version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub sql_text: &'a str,
    pub async_exec: bool,
    pub sequence_id: u64,
}

/// Response envelope shared by both endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("unknown")
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("no message")
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub rowtype: Vec<Column>,
    #[serde(default)]
    pub rowset: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct Column {
    pub name: String,
}

impl From<QueryResponse> for QueryResult {
    fn from(response: QueryResponse) -> Self {
        let columns = response.rowtype.into_iter().map(|c| c.name).collect();
        let rows = response
            .rowset
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        QueryResult { columns, rows }
    }
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
