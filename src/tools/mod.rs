//! MCP tool modules, one per package ecosystem.
//!
//! Every tool call runs the same pipeline: validate arguments, resolve
//! credentials, build a client for this call only, run the ecosystem's
//! executor, then normalize or paginate and shape the result.

pub mod docker;
pub mod maven;
pub mod python;
pub mod types;

pub use docker::DockerTools;
pub use maven::MavenTools;
pub use python::PythonTools;
pub use types::{
    GetDockerTagsArgs, GetMavenVersionsArgs, GetPythonVersionsArgs, ListDockerImagesArgs,
    SearchMavenArtifactArgs, SearchPythonPackageArgs,
};

use crate::common::security::{validate_audited, AuditLogger, ValidationError};
use crate::nexus::{NexusClient, Shaped};
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use serde_json::{json, Map, Value};

/// Wrap shaped output as a successful tool result.
pub(crate) fn text_result(shaped: Shaped) -> CallToolResult {
    CallToolResult::success(vec![Content::text(shaped.text)])
}

/// Validate an optional argument; absent values pass.
pub(crate) fn validate_optional<F>(
    audit: &AuditLogger,
    value: Option<&str>,
    validator: F,
) -> Result<(), McpError>
where
    F: FnOnce(&str) -> Result<(), ValidationError>,
{
    match value {
        Some(v) => validate_audited(audit, validator(v)),
        None => Ok(()),
    }
}

/// Treat blank optional arguments as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Leading payload fields, plus `backendLimitReached: true` when the
/// client stopped reading Nexus results at `max_backend_items`.
pub(crate) fn output_header(client: &NexusClient, fields: &[(&str, Value)]) -> Map<String, Value> {
    let mut header: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    if client.backend_limit_reached() {
        header.insert("backendLimitReached".to_string(), json!(true));
    }
    header
}
