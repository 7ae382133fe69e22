//! MCP handler for the `get_memo` tool.

use crate::{
    mcp::{
        format::{memo_payload, tool_failure},
        handlers::{move_alias, parse_arguments_value},
    },
    memos::{MemosApi, normalize_memo_name},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::Value;

/// Request payload accepted by the `get_memo` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GetMemoRequest {
    /// Memo resource name (`memos/{id}`) or bare id.
    pub(crate) name: String,
}

/// Handle the `get_memo` tool by fetching one memo.
pub(crate) async fn handle_get(
    memos: &dyn MemosApi,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: GetMemoRequest = parse_arguments_value(normalize_get_arguments(arguments))?;
    let name = normalize_memo_name(&args.name).ok_or_else(|| {
        McpError::invalid_params(
            format!("`name` must look like memos/{{id}} (got '{}')", args.name),
            None,
        )
    })?;

    match memos.get_memo(&name).await {
        Ok(memo) => Ok(CallToolResult::structured(memo_payload(&memo))),
        Err(error) => Ok(tool_failure(&error)),
    }
}

/// Accept `id` as an alias for `name`, including numeric ids.
pub(crate) fn normalize_get_arguments(arguments: Option<JsonObject>) -> Value {
    let mut map = arguments.unwrap_or_default();
    if let Some(Value::Number(id)) = map.get("id") {
        let id = id.to_string();
        map.insert("id".into(), Value::String(id));
    }
    move_alias(&mut map, "id", "name");
    Value::Object(map)
}
