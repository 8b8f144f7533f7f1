//! Command line and environment configuration.
//!
//! Every flag has a `NEXUS_MCP_*` environment fallback; flags win. The
//! parsed [`Cli`] is turned into an immutable [`Settings`] that all tool
//! calls share read-only.

use crate::nexus::shaper::{OutputLimits, OverflowPolicy, DEFAULT_MAX_OUTPUT_BYTES};
use crate::nexus::ClientSettings;
use clap::Parser;
use std::time::Duration;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// MCP streamable HTTP at /mcp
    StreamableHttp,
}

/// Where tool calls take their Nexus credentials from.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CredentialMode {
    /// Headers for calls that arrive over HTTP, parameters otherwise
    #[default]
    Auto,
    /// Always the nexus_* tool parameters
    Parameters,
    /// Always the X-Nexus-* request headers
    Headers,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowCli {
    /// Drop trailing items and flag the response as truncated
    Truncate,
    /// Fail the call
    Fail,
}

impl From<OverflowCli> for OverflowPolicy {
    fn from(val: OverflowCli) -> Self {
        match val {
            OverflowCli::Truncate => OverflowPolicy::Truncate,
            OverflowCli::Fail => OverflowPolicy::Fail,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "nexus-mcp")]
#[command(about = "MCP server for querying Sonatype Nexus Repository Manager")]
#[command(version)]
pub struct Cli {
    /// Transport to serve MCP over
    #[arg(long, env = "NEXUS_MCP_TRANSPORT", value_enum, default_value = "streamable-http")]
    pub transport: Transport,

    /// Host to bind to (streamable-http only)
    #[arg(long, env = "NEXUS_MCP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to (streamable-http only)
    #[arg(long, env = "NEXUS_MCP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Where credentials are read from on each call
    #[arg(long, env = "NEXUS_MCP_CREDENTIAL_SOURCE", value_enum, default_value = "auto")]
    pub credential_source: CredentialMode,

    /// Page size used when a call does not pass one
    #[arg(long, env = "NEXUS_MCP_DEFAULT_PAGE_SIZE", default_value_t = 20,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub default_page_size: u64,

    /// Largest page a call may request; larger requests are clamped
    #[arg(long, env = "NEXUS_MCP_MAX_PAGE_SIZE", default_value_t = 100,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub max_page_size: u64,

    /// Ceiling on the serialized size of one tool response
    #[arg(long, env = "NEXUS_MCP_MAX_OUTPUT_BYTES", default_value_t = DEFAULT_MAX_OUTPUT_BYTES as u64,
          value_parser = clap::value_parser!(u64).range(256..))]
    pub max_output_bytes: u64,

    /// What to do when a response exceeds the output ceiling
    #[arg(long, env = "NEXUS_MCP_OVERFLOW", value_enum, default_value = "truncate")]
    pub overflow: OverflowCli,

    /// Timeout for each request to Nexus
    #[arg(long, env = "NEXUS_MCP_REQUEST_TIMEOUT_SECS", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Timeout for a whole tool call
    #[arg(long, env = "NEXUS_MCP_TOOL_TIMEOUT_SECS", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub tool_timeout_secs: u64,

    /// Stop following Nexus continuation tokens after this many components
    #[arg(long, env = "NEXUS_MCP_MAX_BACKEND_ITEMS", default_value_t = 1000,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub max_backend_items: u64,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        let max_page_size = self.max_page_size as usize;
        Settings {
            credential_mode: self.credential_source,
            default_page_size: (self.default_page_size as usize).min(max_page_size),
            max_page_size,
            output: OutputLimits {
                max_output_bytes: self.max_output_bytes as usize,
                overflow: self.overflow.into(),
            },
            client: ClientSettings {
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_backend_items: self.max_backend_items as usize,
                ..ClientSettings::default()
            },
            tool_timeout_secs: self.tool_timeout_secs,
        }
    }
}

/// Server-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credential_mode: CredentialMode,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub output: OutputLimits,
    pub client: ClientSettings,
    pub tool_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential_mode: CredentialMode::Auto,
            default_page_size: 20,
            max_page_size: crate::nexus::pagination::MAX_PAGE_SIZE,
            output: OutputLimits::default(),
            client: ClientSettings::default(),
            tool_timeout_secs: 120,
        }
    }
}
