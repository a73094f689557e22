// ABOUTME: In-memory AWS and Snowflake fakes for reconciler tests.
// ABOUTME: Seedable into missing, broken, or healthy states; journals every write.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use vsi::config::SnowflakeConfig;
use vsi::provider::{
    FunctionSpec, GatewayError, GatewayOps, GatewayResource, IamError, IamOps, IdentityError,
    IdentityOps, IntegrationSpec, InvokePermission, LambdaError, LambdaOps, ObjectStore,
    ObjectStoreError, QueryResult, RestApiSpec, SqlError, SqlOps,
};
use vsi::types::{GatewayResourceId, RestApiId};

pub const ACCOUNT_ID: &str = "123456789012";

/// One mutating call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateBucket(String),
    PutObject(String),
    CreateRole(String),
    UpdateAssumeRolePolicy(String),
    CreatePolicy(String),
    AttachRolePolicy(String),
    CreateFunction(String),
    DeleteFunction(String),
    AddPermission(String),
    CreateRestApi(String),
    CreateResource(String),
    PutMethod(String),
    PutIntegration(String),
    CreateDeployment(String),
}

/// How `list_objects` should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFailure {
    Credentials,
    Network,
}

#[derive(Debug, Default)]
struct Function {
    healthy: bool,
    statements: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct CloudState {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), Vec<u8>>,
    roles: BTreeMap<String, String>,
    broken_roles: BTreeSet<String>,
    policies: BTreeMap<String, String>,
    functions: BTreeMap<String, Function>,
    apis: BTreeMap<String, Vec<GatewayResource>>,
    broken_apis: BTreeSet<String>,
    list_failure: Option<ListFailure>,
    rest_api_failures: u32,
    function_failures: u32,
    next_id: u32,
    journal: Vec<Call>,
}

impl CloudState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:04}", self.next_id)
    }
}

/// Fake for every AWS capability trait.
#[derive(Debug, Default)]
pub struct FakeCloud {
    state: Mutex<CloudState>,
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.state.lock().buckets.insert(bucket.to_string());
        self
    }

    pub fn with_object(self, bucket: &str, key: &str, body: &[u8]) -> Self {
        self.state
            .lock()
            .objects
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
        self
    }

    pub fn fail_listing(&self, failure: ListFailure) {
        self.state.lock().list_failure = Some(failure);
    }

    /// Make `get_role` fail with a non-not-found error for `name`.
    pub fn break_role(&self, name: &str) {
        self.state.lock().broken_roles.insert(name.to_string());
    }

    pub fn remove_role(&self, name: &str) {
        self.state.lock().roles.remove(name);
    }

    /// Drop every resource of a REST API except its root.
    pub fn strip_resources(&self, api: &str) {
        if let Some(resources) = self.state.lock().apis.get_mut(api) {
            resources.retain(|r| r.is_root());
        }
    }

    /// Remove `method` from the resource at `path_part`.
    pub fn remove_method(&self, api: &str, path_part: &str, method: &str) {
        if let Some(resources) = self.state.lock().apis.get_mut(api) {
            for resource in resources
                .iter_mut()
                .filter(|r| r.path_part.as_deref() == Some(path_part))
            {
                resource.methods.retain(|m| !m.eq_ignore_ascii_case(method));
            }
        }
    }

    /// Put an existing function into the failed state.
    pub fn break_function(&self, name: &str) {
        if let Some(function) = self.state.lock().functions.get_mut(name) {
            function.healthy = false;
        }
    }

    pub fn remove_function(&self, name: &str) {
        self.state.lock().functions.remove(name);
    }

    pub fn remove_rest_api(&self, id: &str) {
        self.state.lock().apis.remove(id);
    }

    pub fn break_rest_api(&self, id: &str) {
        self.state.lock().broken_apis.insert(id.to_string());
    }

    /// The next `count` REST API creations fail transiently.
    pub fn fail_rest_api_creation(&self, count: u32) {
        self.state.lock().rest_api_failures = count;
    }

    /// The next `count` function creations fail transiently.
    pub fn fail_function_creation(&self, count: u32) {
        self.state.lock().function_failures = count;
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn trust_policy(&self, role: &str) -> Option<String> {
        self.state.lock().roles.get(role).cloned()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.state.lock().functions.keys().cloned().collect()
    }

    pub fn rest_api_ids(&self) -> Vec<String> {
        self.state.lock().apis.keys().cloned().collect()
    }

    pub fn permissions(&self, function: &str) -> Vec<String> {
        self.state
            .lock()
            .functions
            .get(function)
            .map(|f| f.statements.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn resources(&self, api: &str) -> Vec<GatewayResource> {
        self.state.lock().apis.get(api).cloned().unwrap_or_default()
    }

    pub fn journal(&self) -> Vec<Call> {
        self.state.lock().journal.clone()
    }

    /// Journal entries other than object uploads.
    pub fn resource_calls(&self) -> Vec<Call> {
        self.journal()
            .into_iter()
            .filter(|call| !matches!(call, Call::PutObject(_)))
            .collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().journal.iter().filter(|c| predicate(*c)).count()
    }
}

#[async_trait]
impl ObjectStore for FakeCloud {
    async fn list_objects(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        let state = self.state.lock();
        match state.list_failure {
            Some(ListFailure::Credentials) => {
                return Err(ObjectStoreError::InvalidCredentials(
                    "SignatureDoesNotMatch".into(),
                ));
            }
            Some(ListFailure::Network) => {
                return Err(ObjectStoreError::Provider("dispatch failure".into()));
            }
            None => {}
        }
        if state.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(ObjectStoreError::NoSuchBucket(bucket.to_string()))
        }
    }

    async fn create_bucket(&self, bucket: &str, _zone: &str) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreateBucket(bucket.to_string()));
        if !state.buckets.insert(bucket.to_string()) {
            return Err(ObjectStoreError::BucketAlreadyExists(bucket.to_string()));
        }
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.get_object(bucket, key).await.map(|_| ())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let state = self.state.lock();
        if !state.buckets.contains(bucket) {
            return Err(ObjectStoreError::NoSuchBucket(bucket.to_string()));
        }
        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ObjectStoreError::NoSuchKey(key.to_string()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock();
        if !state.buckets.contains(bucket) {
            return Err(ObjectStoreError::NoSuchBucket(bucket.to_string()));
        }
        state.journal.push(Call::PutObject(key.to_string()));
        state
            .objects
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

#[async_trait]
impl IamOps for FakeCloud {
    async fn get_role(&self, name: &str) -> Result<(), IamError> {
        let state = self.state.lock();
        if state.broken_roles.contains(name) {
            return Err(IamError::Provider(format!("access denied reading {name}")));
        }
        if state.roles.contains_key(name) {
            Ok(())
        } else {
            Err(IamError::NotFound(name.to_string()))
        }
    }

    async fn create_role(
        &self,
        name: &str,
        trust_policy: &str,
        _description: &str,
    ) -> Result<(), IamError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreateRole(name.to_string()));
        if state.roles.contains_key(name) {
            return Err(IamError::AlreadyExists(name.to_string()));
        }
        state.roles.insert(name.to_string(), trust_policy.to_string());
        state.broken_roles.remove(name);
        Ok(())
    }

    async fn update_assume_role_policy(&self, name: &str, policy: &str) -> Result<(), IamError> {
        let mut state = self.state.lock();
        state
            .journal
            .push(Call::UpdateAssumeRolePolicy(name.to_string()));
        match state.roles.get_mut(name) {
            Some(existing) => {
                *existing = policy.to_string();
                Ok(())
            }
            None => Err(IamError::NotFound(name.to_string())),
        }
    }

    async fn get_policy(&self, arn: &str) -> Result<(), IamError> {
        if self.state.lock().policies.contains_key(arn) {
            Ok(())
        } else {
            Err(IamError::NotFound(arn.to_string()))
        }
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<String, IamError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreatePolicy(name.to_string()));
        let arn = format!("arn:aws:iam::{ACCOUNT_ID}:policy/{name}");
        if state.policies.contains_key(&arn) {
            return Err(IamError::AlreadyExists(name.to_string()));
        }
        state.policies.insert(arn.clone(), document.to_string());
        Ok(arn)
    }

    async fn attach_role_policy(&self, role: &str, policy_arn: &str) -> Result<(), IamError> {
        let mut state = self.state.lock();
        state.journal.push(Call::AttachRolePolicy(role.to_string()));
        if !state.roles.contains_key(role) {
            return Err(IamError::NotFound(role.to_string()));
        }
        if !state.policies.contains_key(policy_arn) {
            return Err(IamError::NotFound(policy_arn.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LambdaOps for FakeCloud {
    async fn get_function(&self, name: &str) -> Result<(), LambdaError> {
        match self.state.lock().functions.get(name) {
            Some(function) if function.healthy => Ok(()),
            Some(_) => Err(LambdaError::Unhealthy(format!("{name}: Failed"))),
            None => Err(LambdaError::NotFound(name.to_string())),
        }
    }

    async fn create_function(&self, spec: &FunctionSpec) -> Result<String, LambdaError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreateFunction(spec.name.clone()));
        if state.function_failures > 0 {
            state.function_failures -= 1;
            return Err(LambdaError::Provider(
                "The role defined for the function cannot be assumed by Lambda".into(),
            ));
        }
        if state.functions.contains_key(&spec.name) {
            return Err(LambdaError::Conflict(spec.name.clone()));
        }
        state.functions.insert(
            spec.name.clone(),
            Function {
                healthy: true,
                statements: BTreeSet::new(),
            },
        );
        Ok(format!(
            "arn:aws:lambda:eu-west-1:{ACCOUNT_ID}:function:{}",
            spec.name
        ))
    }

    async fn delete_function(&self, name: &str) -> Result<(), LambdaError> {
        let mut state = self.state.lock();
        state.journal.push(Call::DeleteFunction(name.to_string()));
        state
            .functions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| LambdaError::NotFound(name.to_string()))
    }

    async fn add_permission(&self, permission: &InvokePermission) -> Result<(), LambdaError> {
        let mut state = self.state.lock();
        state
            .journal
            .push(Call::AddPermission(permission.function_name.clone()));
        let function = state
            .functions
            .get_mut(&permission.function_name)
            .ok_or_else(|| LambdaError::NotFound(permission.function_name.clone()))?;
        if !function.statements.insert(permission.statement_id.clone()) {
            return Err(LambdaError::Conflict(permission.statement_id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayOps for FakeCloud {
    async fn get_rest_api(&self, id: &RestApiId) -> Result<(), GatewayError> {
        let state = self.state.lock();
        if state.broken_apis.contains(id.as_str()) {
            return Err(GatewayError::Provider(format!("{id} is unavailable")));
        }
        if state.apis.contains_key(id.as_str()) {
            Ok(())
        } else {
            Err(GatewayError::NotFound(id.to_string()))
        }
    }

    async fn create_rest_api(&self, spec: &RestApiSpec) -> Result<RestApiId, GatewayError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreateRestApi(spec.name.clone()));
        if state.rest_api_failures > 0 {
            state.rest_api_failures -= 1;
            return Err(GatewayError::Provider("TooManyRequestsException".into()));
        }
        let id = state.next_id("api");
        let root = state.next_id("root");
        state.apis.insert(
            id.clone(),
            vec![GatewayResource {
                id: GatewayResourceId::new(root),
                parent_id: None,
                path: "/".into(),
                path_part: None,
                methods: Vec::new(),
            }],
        );
        Ok(RestApiId::new(id))
    }

    async fn get_resources(&self, id: &RestApiId) -> Result<Vec<GatewayResource>, GatewayError> {
        self.state
            .lock()
            .apis
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn create_resource(
        &self,
        api: &RestApiId,
        parent: &GatewayResourceId,
        path_part: &str,
    ) -> Result<GatewayResourceId, GatewayError> {
        let mut state = self.state.lock();
        state.journal.push(Call::CreateResource(path_part.to_string()));
        let id = GatewayResourceId::new(state.next_id("res"));
        let resources = state
            .apis
            .get_mut(api.as_str())
            .ok_or_else(|| GatewayError::NotFound(api.to_string()))?;
        if resources
            .iter()
            .any(|r| r.path_part.as_deref() == Some(path_part))
        {
            return Err(GatewayError::Conflict(path_part.to_string()));
        }
        resources.push(GatewayResource {
            id: id.clone(),
            parent_id: Some(parent.clone()),
            path: format!("/{path_part}"),
            path_part: Some(path_part.to_string()),
            methods: Vec::new(),
        });
        Ok(id)
    }

    async fn put_method(
        &self,
        api: &RestApiId,
        resource: &GatewayResourceId,
        http_method: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.journal.push(Call::PutMethod(resource.to_string()));
        let resource = state
            .apis
            .get_mut(api.as_str())
            .and_then(|resources| resources.iter_mut().find(|r| &r.id == resource))
            .ok_or_else(|| GatewayError::NotFound(resource.to_string()))?;
        if resource.has_method(http_method) {
            return Err(GatewayError::Conflict(http_method.to_string()));
        }
        resource.methods.push(http_method.to_string());
        Ok(())
    }

    async fn put_integration(
        &self,
        _api: &RestApiId,
        _resource: &GatewayResourceId,
        integration: &IntegrationSpec,
    ) -> Result<(), GatewayError> {
        self.state
            .lock()
            .journal
            .push(Call::PutIntegration(integration.uri.clone()));
        Ok(())
    }

    async fn create_deployment(&self, api: &RestApiId, stage: &str) -> Result<(), GatewayError> {
        self.state
            .lock()
            .journal
            .push(Call::CreateDeployment(format!("{api}/{stage}")));
        Ok(())
    }
}

#[async_trait]
impl IdentityOps for FakeCloud {
    async fn account_id(&self) -> Result<String, IdentityError> {
        Ok(ACCOUNT_ID.to_string())
    }
}

// =============================================================================
// Snowflake
// =============================================================================

#[derive(Debug, Default)]
struct Warehouse {
    unreachable: bool,
    functions: BTreeSet<String>,
    integration_endpoint: Option<String>,
}

#[derive(Debug, Default)]
struct SqlState {
    accounts: BTreeMap<String, Warehouse>,
    statements: Vec<(String, String)>,
}

/// Fake Snowflake that understands the handful of statements the installer
/// issues.
#[derive(Debug, Default)]
pub struct FakeSql {
    state: Mutex<SqlState>,
}

#[allow(dead_code)]
impl FakeSql {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_unreachable(&self, account: &str) {
        self.state
            .lock()
            .accounts
            .entry(account.to_string())
            .or_default()
            .unreachable = true;
    }

    pub fn drop_function(&self, account: &str, name: &str) {
        if let Some(warehouse) = self.state.lock().accounts.get_mut(account) {
            warehouse.functions.remove(name);
        }
    }

    pub fn functions(&self, account: &str) -> Vec<String> {
        self.state
            .lock()
            .accounts
            .get(account)
            .map(|w| w.functions.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn integration_endpoint(&self, account: &str) -> Option<String> {
        self.state
            .lock()
            .accounts
            .get(account)
            .and_then(|w| w.integration_endpoint.clone())
    }

    /// Statements that change something, as `(account, statement)`.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .statements
            .iter()
            .filter(|(_, s)| s.starts_with("create or replace"))
            .cloned()
            .collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().statements.clear();
    }
}

fn identifier_after<'s>(statement: &'s str, prefix: &str) -> Option<&'s str> {
    statement
        .strip_prefix(prefix)?
        .split_whitespace()
        .next()
}

fn quoted(statement: &str, after: &str) -> Option<String> {
    let rest = &statement[statement.find(after)? + after.len()..];
    let start = rest.find('\'')? + 1;
    let end = rest[start..].find('\'')? + start;
    Some(rest[start..end].to_string())
}

#[async_trait]
impl SqlOps for FakeSql {
    async fn execute(
        &self,
        account: &SnowflakeConfig,
        statement: &str,
    ) -> Result<QueryResult, SqlError> {
        let mut state = self.state.lock();
        let warehouse = state.accounts.entry(account.account.clone()).or_default();
        if warehouse.unreachable {
            return Err(SqlError::Connection {
                account: account.account.clone(),
                message: "connection refused".into(),
            });
        }

        let mut result = QueryResult::default();
        if let Some(name) = identifier_after(statement, "create or replace external function ") {
            warehouse.functions.insert(name.to_uppercase());
        } else if statement.starts_with("create or replace api integration ") {
            warehouse.integration_endpoint = quoted(statement, "api_allowed_prefixes");
        } else if statement.starts_with("describe integration ") {
            if warehouse.integration_endpoint.is_none() {
                return Err(SqlError::Statement {
                    code: "002003".into(),
                    message: "Integration does not exist".into(),
                });
            }
            result.columns = vec!["property".into(), "property_value".into()];
            result.rows = vec![
                vec![
                    Some("API_AWS_IAM_USER_ARN".into()),
                    Some(format!("arn:aws:iam::999999999999:user/{}", account.account)),
                ],
                vec![
                    Some("API_AWS_EXTERNAL_ID".into()),
                    Some(format!("{}_SFCRole=1_abc", account.account)),
                ],
            ];
        } else if statement.contains("information_schema.functions") {
            result.columns = vec!["function_name".into()];
            if let Some(name) = quoted(statement, "function_name =")
                && warehouse.functions.contains(&name)
            {
                result.rows.push(vec![Some(name)]);
            }
        }

        state
            .statements
            .push((account.account.clone(), statement.to_string()));
        Ok(result)
    }
}
