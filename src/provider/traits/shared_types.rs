// ABOUTME: Request and response types shared by the provider capability traits.
// ABOUTME: FunctionSpec, InvokePermission, RestApiSpec, GatewayResource, QueryResult.

use crate::types::GatewayResourceId;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Everything needed to create one Lambda function.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// Function name.
    pub name: String,
    /// Execution role ARN.
    pub role_arn: String,
    /// Handler entry point inside the package.
    pub handler: String,
    /// Runtime identifier (e.g. `provided.al2023`).
    pub runtime: String,
    /// Invocation timeout.
    pub timeout: Duration,
    /// Environment variables.
    pub environment: BTreeMap<String, String>,
    /// Zipped handler package, shared across all six functions.
    pub package: Arc<[u8]>,
}

/// Grant allowing API Gateway to invoke a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokePermission {
    pub function_name: String,
    pub statement_id: String,
    pub principal: String,
    pub source_arn: String,
}

/// Parameters for a new REST API.
#[derive(Debug, Clone)]
pub struct RestApiSpec {
    pub name: String,
    pub description: String,
    /// Resource policy document (JSON).
    pub policy: String,
}

/// One resource of a REST API as returned by `get_resources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResource {
    pub id: GatewayResourceId,
    pub parent_id: Option<GatewayResourceId>,
    pub path: String,
    pub path_part: Option<String>,
    /// HTTP methods already configured on the resource.
    pub methods: Vec<String>,
}

impl GatewayResource {
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Find the resource at `path_part` directly under `parent`.
pub fn child_resource<'r>(
    resources: &'r [GatewayResource],
    parent: &GatewayResourceId,
    path_part: &str,
) -> Option<&'r GatewayResource> {
    resources.iter().find(|resource| {
        resource.parent_id.as_ref() == Some(parent) && resource.path_part.as_deref() == Some(path_part)
    })
}

/// Proxy integration between a resource method and a Lambda function.
#[derive(Debug, Clone)]
pub struct IntegrationSpec {
    pub http_method: String,
    /// Method used to call the backend; always POST for Lambda proxies.
    pub integration_http_method: String,
    pub uri: String,
}

/// Rows returned by a SQL statement, all values as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value of `column` in row `row`, if present and not NULL.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}
