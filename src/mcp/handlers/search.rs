//! Handler and helpers for the `search_memo` tool.

use crate::{
    mcp::{
        format::{search_payload, tool_failure},
        handlers::{move_alias, parse_arguments_value},
    },
    memos::{MemoQuery, MemosApi},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::Value;

/// Largest page size accepted from clients.
pub(crate) const MAX_SEARCH_LIMIT: u32 = 1000;

/// Raw search request payload accepted from MCP clients.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SearchMemoRequest {
    /// Keywords to look for in memo content.
    pub(crate) key_word: String,
    /// Optional page size forwarded to Memos.
    #[serde(default)]
    pub(crate) limit: Option<u32>,
}

/// Handle the `search_memo` tool by running a content search on the Memos server.
pub(crate) async fn handle_search(
    memos: &dyn MemosApi,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SearchMemoRequest = parse_arguments_value(normalize_search_arguments(arguments))?;
    let query = validate_search_request(args)?;

    match memos.search_memos(&query).await {
        Ok(found) => Ok(CallToolResult::structured(search_payload(
            &query.keyword,
            &found,
        ))),
        Err(error) => Ok(tool_failure(&error)),
    }
}

/// Normalize search arguments, honoring the `keyword` and `query` aliases.
pub(crate) fn normalize_search_arguments(arguments: Option<JsonObject>) -> Value {
    let mut map = arguments.unwrap_or_default();
    move_alias(&mut map, "keyword", "key_word");
    move_alias(&mut map, "query", "key_word");
    Value::Object(map)
}

fn validate_search_request(args: SearchMemoRequest) -> Result<MemoQuery, McpError> {
    let keyword = args.key_word.trim();
    if keyword.is_empty() {
        return Err(McpError::invalid_params("`key_word` must not be empty", None));
    }

    if let Some(limit) = args.limit {
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(McpError::invalid_params(
                format!("`limit` must be between 1 and {MAX_SEARCH_LIMIT}"),
                None,
            ));
        }
    }

    Ok(MemoQuery {
        keyword: keyword.to_string(),
        limit: args.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    fn request(key_word: &str, limit: Option<u32>) -> SearchMemoRequest {
        SearchMemoRequest {
            key_word: key_word.into(),
            limit,
        }
    }

    #[test]
    fn aliases_map_onto_key_word() {
        let raw = json!({ "keyword": "rust", "limit": 3 })
            .as_object()
            .cloned();
        let parsed: SearchMemoRequest =
            parse_arguments_value(normalize_search_arguments(raw)).expect("parse");
        assert_eq!(parsed.key_word, "rust");
        assert_eq!(parsed.limit, Some(3));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = json!({ "key_word": "rust", "tags": ["x"] }).as_object().cloned();
        let error = parse_arguments_value::<SearchMemoRequest>(normalize_search_arguments(raw))
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn validate_trims_keyword() {
        let query = validate_search_request(request("  rust  ", None)).expect("valid");
        assert_eq!(query.keyword, "rust");
        assert_eq!(query.limit, None);
    }

    #[test]
    fn validate_rejects_blank_keyword() {
        let error = validate_search_request(request("   ", None)).unwrap_err();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn validate_rejects_limit_out_of_bounds() {
        assert!(validate_search_request(request("rust", Some(0))).is_err());
        assert!(validate_search_request(request("rust", Some(MAX_SEARCH_LIMIT + 1))).is_err());
        assert!(validate_search_request(request("rust", Some(MAX_SEARCH_LIMIT))).is_ok());
    }
}
