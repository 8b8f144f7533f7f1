// Library exports for nexus-mcp
// This allows integration tests and external code to use the MCP tools

pub mod common;
pub mod config;
pub mod nexus;
pub mod tools;
