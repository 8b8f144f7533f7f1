//! Common trait for all MCP tool modules.
//!
//! [`ToolModule`] is implemented by `MavenTools`, `PythonTools` and
//! `DockerTools`. Besides the audit logger it gives every module access to
//! the shared [`Settings`] and to the per-call credential and client setup,
//! so each tool only has to describe its query.
//!
//! # Examples
//!
//! ```no_run
//! use nexus_mcp::common::tool_module::ToolModule;
//! use nexus_mcp::common::security::audit_logger;
//! use nexus_mcp::config::Settings;
//! use nexus_mcp::tools::MavenTools;
//! use std::sync::Arc;
//!
//! let tools = MavenTools::new(audit_logger(), Arc::new(Settings::default()));
//! println!("Module name: {}", tools.name());
//! ```

use crate::common::security::{nexus_error_to_mcp, AuditLogger};
use crate::config::{CredentialMode, Settings};
use crate::nexus::credentials::{resolve, ConnectionArgs, CredentialSource};
use crate::nexus::{ConnectionParams, NexusClient, NexusError};
use axum::http::HeaderMap;
use rmcp::ErrorData as McpError;
use std::sync::Arc;

/// Common trait for all MCP tool modules.
pub trait ToolModule {
    /// Returns a reference to the audit logger for this tool module.
    fn audit_logger(&self) -> &Arc<AuditLogger>;

    /// Server settings shared by every call.
    fn settings(&self) -> &Arc<Settings>;

    /// Returns the name of this tool module.
    fn name(&self) -> &'static str;

    /// Pick the credential source for one call.
    ///
    /// `headers` is `Some` only when the call arrived over HTTP.
    fn credential_source<'a>(
        &self,
        args: &'a ConnectionArgs,
        headers: Option<&'a HeaderMap>,
    ) -> CredentialSource<'a> {
        match self.settings().credential_mode {
            CredentialMode::Parameters => CredentialSource::Parameters(args),
            CredentialMode::Headers => CredentialSource::Headers(headers),
            CredentialMode::Auto if headers.is_some() => CredentialSource::Headers(headers),
            CredentialMode::Auto => CredentialSource::Parameters(args),
        }
    }

    /// Resolve this call's credentials and build its client.
    ///
    /// Credential failures are audited with the instance URL at most.
    fn connect(
        &self,
        args: &ConnectionArgs,
        headers: Option<&HeaderMap>,
    ) -> Result<(ConnectionParams, NexusClient), McpError> {
        let params = resolve(self.credential_source(args, headers)).map_err(|err| {
            self.audit_logger()
                .log_auth_event(false, None, &err.to_string());
            nexus_error_to_mcp(err)
        })?;
        let client =
            NexusClient::new(&params, &self.settings().client).map_err(nexus_error_to_mcp)?;
        Ok((params, client))
    }

    /// Map a pipeline error, auditing rejected credentials.
    fn pipeline_error(&self, tool_name: &str, instance: &str, err: NexusError) -> McpError {
        if let NexusError::AuthenticationFailed { status } = &err {
            self.audit_logger().log_auth_event(
                false,
                Some(instance),
                &format!("Nexus rejected credentials (HTTP {})", status),
            );
        }
        self.log_tool_error(tool_name, &err.to_string());
        nexus_error_to_mcp(err)
    }

    /// Log successful completion of a tool operation.
    fn log_tool_success(&self, tool_name: &str, detail: Option<&str>) {
        let message = match detail {
            Some(d) => format!("{}::{} completed: {}", self.name(), tool_name, d),
            None => format!("{}::{} completed successfully", self.name(), tool_name),
        };
        tracing::debug!("{}", message);
    }

    /// Log a tool error for debugging.
    fn log_tool_error(&self, tool_name: &str, error: &str) {
        tracing::error!("{}::{} failed: {}", self.name(), tool_name, error);
    }
}
