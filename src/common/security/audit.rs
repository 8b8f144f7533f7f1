/// Audit trail for Nexus tool calls
/// Every event is serialized to JSON and emitted on the `audit` tracing target.
/// Events never carry credential values or rejected input values.
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

const AUDIT_TARGET: &str = "audit";

/// Severity an event is emitted at
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Info,
    Warning,
    Error,
}

/// Audit event types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type")]
pub enum AuditEvent {
    /// One finished tool call. `parameters` holds only non-secret arguments.
    ToolInvoked {
        tool_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<serde_json::Value>,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        duration_ms: u64,
    },

    /// An argument was rejected before contacting Nexus.
    ValidationFailed { field: String, reason: String },

    /// A tool body ran past the configured tool timeout.
    OperationTimeout {
        operation: String,
        timeout_secs: u64,
    },

    /// Credentials were missing, malformed or refused by the instance.
    AuthEvent {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        instance: Option<String>,
        reason: String,
    },
}

impl AuditEvent {
    pub fn level(&self) -> SecurityLevel {
        match self {
            AuditEvent::ToolInvoked { success: true, .. } => SecurityLevel::Info,
            AuditEvent::ToolInvoked { success: false, .. }
            | AuditEvent::ValidationFailed { .. }
            | AuditEvent::OperationTimeout { .. } => SecurityLevel::Warning,
            AuditEvent::AuthEvent { success: true, .. } => SecurityLevel::Info,
            AuditEvent::AuthEvent { success: false, .. } => SecurityLevel::Error,
        }
    }
}

/// Stateless audit logger; clones share nothing but the tracing subscriber.
#[derive(Clone, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    /// Emit an event at its own severity
    pub fn log(&self, event: AuditEvent) {
        let level = event.level();
        let event_json = serde_json::to_string(&event)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize event: {}\"}}", e));

        match level {
            SecurityLevel::Info => info!(target: AUDIT_TARGET, event = %event_json, "audit"),
            SecurityLevel::Warning => warn!(target: AUDIT_TARGET, event = %event_json, "audit"),
            SecurityLevel::Error => error!(target: AUDIT_TARGET, event = %event_json, "audit"),
        }
    }

    pub fn log_tool_invocation(
        &self,
        tool_name: &str,
        parameters: Option<serde_json::Value>,
        success: bool,
        error: Option<String>,
        duration_ms: u64,
    ) {
        self.log(AuditEvent::ToolInvoked {
            tool_name: tool_name.to_string(),
            parameters,
            success,
            error,
            duration_ms,
        });
    }

    pub fn log_validation_failure(&self, field: &str, reason: &str) {
        self.log(AuditEvent::ValidationFailed {
            field: field.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn log_timeout(&self, operation: &str, timeout_secs: u64) {
        self.log(AuditEvent::OperationTimeout {
            operation: operation.to_string(),
            timeout_secs,
        });
    }

    /// `instance` is the base URL only; never pass a username or password here.
    pub fn log_auth_event(&self, success: bool, instance: Option<&str>, reason: &str) {
        self.log(AuditEvent::AuthEvent {
            success,
            instance: instance.map(String::from),
            reason: reason.to_string(),
        });
    }
}

static AUDIT_LOGGER: once_cell::sync::Lazy<Arc<AuditLogger>> =
    once_cell::sync::Lazy::new(|| Arc::new(AuditLogger::new()));

/// Shared logger handed to every tool module
pub fn audit_logger() -> Arc<AuditLogger> {
    Arc::clone(&AUDIT_LOGGER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_logger_emits_without_subscriber() {
        let logger = AuditLogger::new();
        logger.log_tool_invocation("get_maven_versions", None, true, None, 100);
        logger.log_timeout("get_docker_tags", 120);
    }

    #[test]
    fn test_global_audit_logger_is_shared() {
        let a = audit_logger();
        let b = audit_logger();
        assert!(Arc::ptr_eq(&a, &b));
        a.log_auth_event(false, Some("https://nexus.example.com"), "HTTP 401");
    }

    #[test]
    fn test_event_levels() {
        let ok = AuditEvent::ToolInvoked {
            tool_name: "list_docker_images".to_string(),
            parameters: None,
            success: true,
            error: None,
            duration_ms: 3,
        };
        assert_eq!(ok.level(), SecurityLevel::Info);

        let rejected = AuditEvent::AuthEvent {
            success: false,
            instance: None,
            reason: "missing required Nexus credentials: nexus_password".to_string(),
        };
        assert_eq!(rejected.level(), SecurityLevel::Error);

        let invalid = AuditEvent::ValidationFailed {
            field: "group_id".to_string(),
            reason: "empty".to_string(),
        };
        assert_eq!(invalid.level(), SecurityLevel::Warning);
    }

    #[test]
    fn test_validation_event_has_no_value_field() {
        let event = AuditEvent::ValidationFailed {
            field: "group_id".to_string(),
            reason: "empty".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "ValidationFailed");
        assert!(json.get("value").is_none());
    }
}
