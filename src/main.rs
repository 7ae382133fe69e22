//! Memos MCP server entrypoint (stdio transport).
//!
//! Parses `--host`, `--port`, and `--token` (with `MEMOS_*` environment fallbacks), then serves
//! the Memos tools to an MCP host over stdin/stdout.
use anyhow::{Context, Result};
use memos_mcp::{config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let config = config::load_from_cli().context("invalid Memos connection settings")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        has_token = config.has_token(),
        "Starting Memos MCP server"
    );

    memos_mcp::serve_stdio(config).await
}
