//! Model Context Protocol (MCP) integration for Memos.
//!
//! This module exposes a Memos server to MCP hosts over stdio. The surface area consists of:
//!
//! - Tools: `search_memo`, `create_memo`, `get_memo`, and `list_memo_tags`.
//! - Resources: `mcp://memos/visibilities`, `mcp://memos/settings`, `mcp://memos/health`, and a
//!   templated `mcp://memo/{id}`.
//!
//! Every tool call maps to a single request against the Memos REST API. Argument problems are
//! reported as `INVALID_PARAMS` protocol errors; failures reported by Memos come back as tool
//! results flagged with `is_error`.

mod format;
mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::{MemosMcpServer, serve_stdio};
