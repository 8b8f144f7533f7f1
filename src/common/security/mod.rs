//! Security infrastructure for nexus-mcp.
//!
//! # Modules
//!
//! - [`audit`] - Security event logging and audit trail management
//! - [`helpers`] - Error mapping, timeouts, cancellation and audited validation
//! - [`input_validation`] - Validation of repository names and coordinates
//!
//! # Credentials
//!
//! Nexus credentials arrive with every call and live only as long as that
//! call. They are never written to audit events, tracing output or error
//! messages; `Debug` implementations of the types holding them redact the
//! password.
//!
//! ## Input Validation
//!
//! Tool arguments are checked before any request is sent to Nexus:
//!
//! - **Length Limits**: every field has a maximum size
//! - **Pattern Matching**: repository names, Maven coordinates, versions,
//!   PyPI project names and Docker image names each have an expected shape
//! - **Control Characters**: null bytes and other control characters are rejected
//!
//! Failures are recorded as `ValidationFailed` audit events that name the
//! field and reason but not the rejected value.
//!
//! # Examples
//!
//! ```no_run
//! use nexus_mcp::common::security::{validate_repository_name, audit_logger};
//!
//! validate_repository_name("maven-releases").expect("Invalid repository name");
//!
//! let logger = audit_logger();
//! logger.log_tool_invocation("get_maven_versions", None, true, None, 0);
//! ```

pub mod audit;
pub mod helpers;
pub mod input_validation;

pub use audit::{audit_logger, AuditLogger};
pub use helpers::{nexus_error_to_mcp, validate_audited, validation_error_to_mcp};
pub use input_validation::{
    validate_continuation_token, validate_image_name, validate_maven_coordinate,
    validate_python_package_name, validate_repository_name, validate_version, ValidationError,
};
