//! Common infrastructure shared by all MCP tools.
//!
//! # Modules
//!
//! - [`tool_registry`] - Central registry for all tool module instances
//! - [`tool_module`] - Trait with the per-call credential and client setup
//! - [`security`] - Input validation, audit logging, error mapping
//! - [`nexus_server`] - Main MCP server implementation
//!
//! # Architecture
//!
//! ```text
//! NexusServer
//!   ├── ToolRegistry (manages all tool instances)
//!   │   ├── MavenTools, PythonTools, DockerTools
//!   │   └── Each tool has Arc<AuditLogger> and Arc<Settings>
//!   └── AuditLogger (security event logging)
//! ```

pub mod nexus_server;
pub mod security;
pub mod tool_module;
pub mod tool_registry;
