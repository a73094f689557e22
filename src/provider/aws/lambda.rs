// ABOUTME: LambdaOps implementation on the Lambda SDK client.
// ABOUTME: A function in the Failed state is reported as unhealthy rather than present.

use async_trait::async_trait;
use aws_sdk_lambda::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, FunctionCode, Runtime, State};

use super::{AwsClients, describe};
use crate::provider::traits::{FunctionSpec, InvokePermission, LambdaError, LambdaOps};

const INVOKE_ACTION: &str = "lambda:InvokeFunction";

fn map_lambda_error<E, R>(err: SdkError<E, R>, name: &str) -> LambdaError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("ResourceNotFoundException") => LambdaError::NotFound(name.to_string()),
        Some("ResourceConflictException") => LambdaError::Conflict(describe(err)),
        _ => LambdaError::Provider(describe(err)),
    }
}

#[async_trait]
impl LambdaOps for AwsClients {
    async fn get_function(&self, name: &str) -> Result<(), LambdaError> {
        let output = self
            .lambda
            .get_function()
            .function_name(name)
            .send()
            .await
            .map_err(|e| map_lambda_error(e, name))?;

        let configuration = output.configuration();
        if configuration.and_then(|c| c.state()) == Some(&State::Failed) {
            let reason = configuration
                .and_then(|c| c.state_reason())
                .unwrap_or("function is in the Failed state");
            return Err(LambdaError::Unhealthy(format!("{name}: {reason}")));
        }
        Ok(())
    }

    async fn create_function(&self, spec: &FunctionSpec) -> Result<String, LambdaError> {
        let environment = spec
            .environment
            .iter()
            .fold(Environment::builder(), |builder, (key, value)| {
                builder.variables(key, value)
            })
            .build();
        let code = FunctionCode::builder()
            .zip_file(Blob::new(spec.package.to_vec()))
            .build();
        let timeout = i32::try_from(spec.timeout.as_secs()).unwrap_or(i32::MAX);

        let output = self
            .lambda
            .create_function()
            .function_name(&spec.name)
            .role(&spec.role_arn)
            .handler(&spec.handler)
            .runtime(Runtime::from(spec.runtime.as_str()))
            .timeout(timeout)
            .environment(environment)
            .code(code)
            .send()
            .await
            .map_err(|e| map_lambda_error(e, &spec.name))?;

        output
            .function_arn()
            .map(str::to_string)
            .ok_or_else(|| LambdaError::Provider(format!("created function {} has no ARN", spec.name)))
    }

    async fn delete_function(&self, name: &str) -> Result<(), LambdaError> {
        self.lambda
            .delete_function()
            .function_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_lambda_error(e, name))
    }

    async fn add_permission(&self, permission: &InvokePermission) -> Result<(), LambdaError> {
        self.lambda
            .add_permission()
            .function_name(&permission.function_name)
            .statement_id(&permission.statement_id)
            .action(INVOKE_ACTION)
            .principal(&permission.principal)
            .source_arn(&permission.source_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_lambda_error(e, &permission.function_name))
    }
}
