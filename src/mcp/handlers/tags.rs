//! Handler for the `list_memo_tags` tool.

use crate::{
    mcp::{
        format::{tags_payload, tool_failure},
        handlers::{parse_arguments, parse_visibility},
    },
    memos::{ALL_MEMOS_PARENT, MemosApi, normalize_parent},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Request payload for the `list_memo_tags` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListMemoTagsRequest {
    /// Owner of the tags; `memos/-` lists tags across every memo.
    #[serde(default)]
    pub(crate) parent: Option<String>,
    /// Visibility of the memos whose tags are listed.
    #[serde(default)]
    pub(crate) visibility: Option<String>,
}

/// Handle the `list_memo_tags` tool, returning the distinct tags known to Memos.
pub(crate) async fn handle_list_tags(
    memos: &dyn MemosApi,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: ListMemoTagsRequest = parse_arguments(arguments)?;
    let requested = args.parent.as_deref().unwrap_or(ALL_MEMOS_PARENT);
    let parent = normalize_parent(requested).ok_or_else(|| {
        McpError::invalid_params(
            format!("`parent` must be memos/{{id}} or memos/- (got '{requested}')"),
            None,
        )
    })?;
    let visibility = parse_visibility(args.visibility)?;

    match memos.list_memo_tags(&parent, visibility).await {
        Ok(tags) => Ok(CallToolResult::structured(tags_payload(
            &parent, visibility, tags,
        ))),
        Err(error) => Ok(tool_failure(&error)),
    }
}
