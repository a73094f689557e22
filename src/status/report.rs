// ABOUTME: Human-readable rendering of a ServiceStatus.
// ABOUTME: One line per resource, causes indented underneath, then account details.

use std::fmt::Write;

use super::{FunctionStatuses, ServiceStatus, StatusResult};

/// Label used for a state in the resource table.
fn label(result: &StatusResult) -> &'static str {
    match result {
        StatusResult::NotChecked => "NOT CHECKED",
        StatusResult::Success => "Success",
        StatusResult::Error(_) => "Error",
        StatusResult::Missing(_) => "Missing",
    }
}

/// Label used for individual functions.
fn function_label(result: &StatusResult) -> &'static str {
    match result {
        StatusResult::NotChecked => "NOT CHECKED",
        StatusResult::Success => "ONLINE",
        StatusResult::Error(_) => "ERROR",
        StatusResult::Missing(_) => "MISSING",
    }
}

fn row(out: &mut String, name: &str, result: &StatusResult) {
    let _ = writeln!(out, "{:<28} {}", format!("{name}:"), label(result));
    if let Some(cause) = result.cause() {
        let _ = writeln!(out, "{:<28}   {}", "", cause);
    }
}

fn functions(out: &mut String, statuses: &FunctionStatuses, indent: usize) {
    for (function, result) in statuses.iter() {
        let _ = writeln!(
            out,
            "{:indent$}{:<24} {}",
            "",
            format!("{}:", function.label()),
            function_label(result),
            indent = indent
        );
    }
}

/// Render the full status table.
pub fn render(status: &ServiceStatus) -> String {
    let mut out = String::new();

    row(&mut out, "AWS Connection", &status.aws_connection);
    row(&mut out, "AWS Credentials", &status.aws_credentials);
    row(&mut out, "AWS Bucket", &status.aws_bucket);
    row(&mut out, "Credential File", &status.credentials_file);
    row(&mut out, "Deployment Info", &status.deployment_info_read);
    out.push('\n');
    row(&mut out, "Lambda Execution Role", &status.lambda_role);
    row(&mut out, "Snowflake API Role", &status.snowflake_role);
    row(&mut out, "Lambda Access Policy", &status.lambda_policy);
    out.push('\n');
    row(&mut out, "AWS API Gateway", &status.aws_gateway);
    row(&mut out, "Gateway Integrations", &status.gateway_integrations);
    row(&mut out, "AWS Lambdas", &status.aws_lambdas);
    functions(&mut out, &status.lambda_details, 4);
    out.push('\n');
    row(&mut out, "Snowflake Health", &status.snowflake_health);

    for account in &status.snowflake_accounts {
        let _ = writeln!(
            out,
            "\n  Snowflake Account '{}' (warehouse '{}', database '{}', schema '{}'):",
            account.account, account.warehouse, account.database, account.schema
        );
        let _ = writeln!(out, "    {:<24} {}", "Connection:", label(&account.connection));
        if let Some(cause) = account.connection.cause() {
            let _ = writeln!(out, "    {:<24}   {}", "", cause);
        }
        functions(&mut out, &account.functions, 4);
    }

    out
}
