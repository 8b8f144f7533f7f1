//! Per-call credential resolution.
//!
//! Every tool call carries its own Nexus instance and credentials, either as
//! tool parameters or as `X-Nexus-*` HTTP headers. [`resolve`] turns either
//! form into a [`ConnectionParams`] without touching the network.

use super::error::{NexusError, NexusResult};
use axum::http::HeaderMap;
use rmcp::schemars;
use url::Url;

pub const HEADER_URL: &str = "x-nexus-url";
pub const HEADER_USERNAME: &str = "x-nexus-username";
pub const HEADER_PASSWORD: &str = "x-nexus-password";
pub const HEADER_VERIFY_SSL: &str = "x-nexus-verify-ssl";

/// Connection parameters accepted on every tool call in parameter mode.
#[derive(Default, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct ConnectionArgs {
    /// Base URL of the Nexus instance (e.g., "https://nexus.example.com")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus_url: Option<String>,
    /// Username for Nexus authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus_username: Option<String>,
    /// Password for Nexus authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus_password: Option<String>,
    /// Verify TLS certificates ("false" to accept self-signed certificates; default "true")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus_verify_ssl: Option<String>,
}

impl std::fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("nexus_url", &self.nexus_url)
            .field("nexus_username", &self.nexus_username)
            .field("nexus_password", &self.nexus_password.as_ref().map(|_| "***"))
            .field("nexus_verify_ssl", &self.nexus_verify_ssl)
            .finish()
    }
}

/// Where a call's credentials are read from.
#[derive(Debug, Clone, Copy)]
pub enum CredentialSource<'a> {
    /// Tool-call parameters (`nexus_url`, `nexus_username`, ...).
    Parameters(&'a ConnectionArgs),
    /// HTTP request headers. `None` when the call did not arrive over HTTP.
    Headers(Option<&'a HeaderMap>),
}

/// Resolved, validated connection parameters for a single call.
///
/// Built once per call and dropped with it. The password never appears in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    base_url: Url,
    username: String,
    password: String,
    verify_tls: bool,
}

impl ConnectionParams {
    pub fn new(base_url: Url, username: String, password: String, verify_tls: bool) -> Self {
        Self {
            base_url,
            username,
            password,
            verify_tls,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Base URL without a trailing slash, used as the fingerprint instance key.
    pub fn instance(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"***")
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Resolve one call's credentials.
///
/// Reports every missing field at once, named the way the caller supplied
/// them. Performs no I/O.
pub fn resolve(source: CredentialSource<'_>) -> NexusResult<ConnectionParams> {
    let (url, username, password, verify, names) = match source {
        CredentialSource::Parameters(args) => (
            non_blank(args.nexus_url.as_deref()),
            non_blank(args.nexus_username.as_deref()),
            non_blank(args.nexus_password.as_deref()),
            args.nexus_verify_ssl.as_deref(),
            ["nexus_url", "nexus_username", "nexus_password"],
        ),
        CredentialSource::Headers(headers) => {
            let get = |name: &str| {
                headers
                    .and_then(|h| h.get(name))
                    .and_then(|v| v.to_str().ok())
            };
            (
                non_blank(get(HEADER_URL)),
                non_blank(get(HEADER_USERNAME)),
                non_blank(get(HEADER_PASSWORD)),
                get(HEADER_VERIFY_SSL),
                ["X-Nexus-Url", "X-Nexus-Username", "X-Nexus-Password"],
            )
        }
    };

    let missing: Vec<String> = [url.is_none(), username.is_none(), password.is_none()]
        .iter()
        .zip(names)
        .filter(|(absent, _)| **absent)
        .map(|(_, name)| name.to_string())
        .collect();

    match (url, username, password) {
        (Some(url), Some(username), Some(password)) => Ok(ConnectionParams::new(
            parse_instance_url(url)?,
            username.to_string(),
            password.to_string(),
            parse_verify_flag(verify),
        )),
        _ => Err(NexusError::MissingCredentials { fields: missing }),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an instance URL, accepting only absolute http(s) URLs with a host.
pub fn parse_instance_url(raw: &str) -> NexusResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| NexusError::InvalidCredentials(format!("invalid Nexus URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NexusError::InvalidCredentials(format!(
            "URL scheme must be http or https, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(NexusError::InvalidCredentials(format!(
            "invalid Nexus URL '{}': missing host",
            raw
        )));
    }

    if !url.username().is_empty() || url.password().is_some() {
        // Embedded userinfo would leak into logs and error messages.
        return Err(NexusError::InvalidCredentials(
            "Nexus URL must not embed credentials; pass them separately".to_string(),
        ));
    }

    Ok(url)
}

/// `false`, `0`, `no` and `off` disable verification; anything else keeps it.
pub fn parse_verify_flag(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "false" | "0" | "no" | "off"),
        None => true,
    }
}
