//! Error taxonomy for the Nexus query pipeline.
//!
//! Local validation failures (credentials, page size, cursors, arguments) are
//! raised before any backend traffic. Backend failures are raised by
//! [`NexusClient`](super::client::NexusClient) and propagate unchanged.
//!
//! No variant ever carries a password. Instance URLs may appear in messages.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NexusError {
    #[error("missing required Nexus credentials: {}", .fields.join(", "))]
    MissingCredentials { fields: Vec<String> },

    #[error("invalid Nexus credentials: {0}")]
    InvalidCredentials(String),

    #[error("authentication failed (HTTP {status}): check username, password and permissions")]
    AuthenticationFailed { status: u16 },

    #[error("Nexus backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid page size {0}: must be at least 1")]
    InvalidPageSize(i64),

    #[error("continuation token was issued for a different query")]
    CursorMismatch,

    #[error("continuation token could not be decoded")]
    InvalidCursor,

    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    #[error("unexpected response from Nexus: {0}")]
    UnexpectedResponse(String),

    #[error("response of {size} bytes exceeds the {limit} byte output limit")]
    OutputTooLarge { size: usize, limit: usize },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl NexusError {
    /// Stable variant name reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } => "MissingCredentials",
            Self::InvalidCredentials(_) => "InvalidCredentials",
            Self::AuthenticationFailed { .. } => "AuthenticationFailed",
            Self::BackendUnavailable(_) => "BackendUnavailable",
            Self::InvalidPageSize(_) => "InvalidPageSize",
            Self::CursorMismatch => "CursorMismatch",
            Self::InvalidCursor => "InvalidCursor",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::UnexpectedResponse(_) => "UnexpectedResponse",
            Self::OutputTooLarge { .. } => "OutputTooLarge",
            Self::ClientBuild(_) => "ClientBuild",
        }
    }

    /// Failures the caller produced and can fix by changing the request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. }
                | Self::InvalidCredentials(_)
                | Self::InvalidPageSize(_)
                | Self::CursorMismatch
                | Self::InvalidCursor
                | Self::InvalidArgument(_)
        )
    }

    /// Only transport-level failures are worth re-invoking unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

pub type NexusResult<T> = Result<T, NexusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_fields() {
        let err = NexusError::MissingCredentials {
            fields: vec!["nexus_url".to_string(), "nexus_username".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required Nexus credentials: nexus_url, nexus_username"
        );
        assert!(err.is_local());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_backend_errors_are_not_local() {
        let unavailable = NexusError::BackendUnavailable("connection refused".to_string());
        assert!(!unavailable.is_local());
        assert!(unavailable.is_retryable());

        let auth = NexusError::AuthenticationFailed { status: 401 };
        assert!(!auth.is_local());
        assert!(!auth.is_retryable());
        assert_eq!(auth.kind(), "AuthenticationFailed");
    }
}
