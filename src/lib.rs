#![deny(missing_docs)]

//! Core library for the Memos MCP server.

/// Connection settings and command-line parsing.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Memos REST API client.
pub mod memos;

pub use config::Config;
pub use mcp::serve_stdio;
