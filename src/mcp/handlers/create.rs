//! MCP handler for the `create_memo` tool.

use crate::{
    mcp::{
        format::{create_payload, tool_failure},
        handlers::{parse_arguments, parse_visibility},
    },
    memos::MemosApi,
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Request payload accepted by the `create_memo` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreateMemoRequest {
    /// Markdown content of the memo.
    pub(crate) content: String,
    /// Optional visibility; defaults to `PUBLIC`.
    #[serde(default)]
    pub(crate) visibility: Option<String>,
}

/// Handle the `create_memo` tool by creating a memo on the Memos server.
pub(crate) async fn handle_create(
    memos: &dyn MemosApi,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CreateMemoRequest = parse_arguments(arguments)?;
    if args.content.trim().is_empty() {
        return Err(McpError::invalid_params("`content` must not be empty", None));
    }
    let visibility = parse_visibility(args.visibility)?;

    match memos.create_memo(&args.content, visibility).await {
        Ok(memo) => Ok(CallToolResult::structured(create_payload(&memo))),
        Err(error) => Ok(tool_failure(&error)),
    }
}
