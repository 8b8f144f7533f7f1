/// Security helper functions for integrating validation, error mapping and
/// audit logging into tools
use super::{AuditLogger, ValidationError};
use crate::nexus::NexusError;
use rmcp::ErrorData as McpError;
use serde_json::json;
use std::time::Instant;

/// Convert ValidationError to McpError
pub fn validation_error_to_mcp(err: ValidationError) -> McpError {
    McpError::invalid_params(
        err.to_string(),
        Some(json!({
            "kind": "InvalidArgument",
            "retryable": false,
            "field": err.field(),
        })),
    )
}

/// Convert NexusError to McpError
///
/// Caller mistakes become `invalid_params`; backend and shaping failures
/// become `internal_error`.
pub fn nexus_error_to_mcp(err: NexusError) -> McpError {
    let data = Some(json!({
        "kind": err.kind(),
        "retryable": err.is_retryable(),
    }));
    if err.is_local() {
        McpError::invalid_params(err.to_string(), data)
    } else {
        McpError::internal_error(err.to_string(), data)
    }
}

/// Run a validator, recording failures in the audit log
pub fn validate_audited(
    audit: &AuditLogger,
    result: Result<(), ValidationError>,
) -> Result<(), McpError> {
    result.map_err(|err| {
        audit.log_validation_failure(err.field(), &err.reason());
        validation_error_to_mcp(err)
    })
}

/// Audit tool execution with timing
pub async fn audit_tool_execution<F, Fut, T>(
    audit: &AuditLogger,
    tool_name: &str,
    parameters: Option<serde_json::Value>,
    f: F,
) -> Result<T, McpError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, McpError>>,
{
    let start = Instant::now();
    let result = f().await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => {
            audit.log_tool_invocation(tool_name, parameters, true, None, duration_ms);
        }
        Err(e) => {
            audit.log_tool_invocation(
                tool_name,
                parameters,
                false,
                Some(e.message.to_string()),
                duration_ms,
            );
        }
    }

    result
}

/// Execute with timeout
pub async fn with_timeout<F, Fut, T>(
    audit: &AuditLogger,
    operation_name: &str,
    timeout_secs: u64,
    f: F,
) -> Result<T, McpError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, McpError>>,
{
    match tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), f()).await {
        Ok(result) => result,
        Err(_) => {
            audit.log_timeout(operation_name, timeout_secs);
            Err(nexus_error_to_mcp(NexusError::BackendUnavailable(format!(
                "{} timed out after {} seconds",
                operation_name, timeout_secs
            ))))
        }
    }
}

/// Execute with cancellation support
pub async fn with_cancellation<F, Fut, T>(
    ct: &tokio_util::sync::CancellationToken,
    f: F,
) -> Result<T, McpError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, McpError>>,
{
    tokio::select! {
        result = f() => result,
        _ = ct.cancelled() => {
            Err(McpError::internal_error(
                "Operation cancelled by client".to_string(),
                Some(json!({"kind": "Cancelled", "retryable": false})),
            ))
        }
    }
}

/// Macro to wrap tool execution with security features
#[macro_export]
macro_rules! secure_tool {
    (
        audit = $audit:expr,
        tool_name = $tool_name:expr,
        params = $params:expr,
        timeout = $timeout:expr,
        ct = $ct:expr,
        $body:block
    ) => {{
        use $crate::common::security::helpers::{
            audit_tool_execution, with_cancellation, with_timeout,
        };

        audit_tool_execution($audit, $tool_name, Some($params), || async {
            with_cancellation($ct, || async {
                with_timeout($audit, $tool_name, $timeout, || async { $body }).await
            })
            .await
        })
        .await
    }};
}
