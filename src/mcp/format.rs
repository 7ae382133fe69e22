//! Formatting helpers shared across MCP handlers and resources.

use std::collections::BTreeSet;

use crate::memos::{Memo, MemoSummary, MemosError, Visibility, WorkspaceProfile};
use rmcp::model::{CallToolResult, ResourceContents};
use serde::Serialize;
use serde_json::{Map, Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Build the `search_memo` result, keeping server order.
pub(crate) fn search_payload(keyword: &str, memos: &[Memo]) -> Value {
    let summaries: Vec<MemoSummary> = memos.iter().map(MemoSummary::from).collect();

    let mut payload = Map::new();
    payload.insert("keyword".into(), Value::String(keyword.to_string()));
    payload.insert("count".into(), Value::from(summaries.len() as u64));
    payload.insert("memos".into(), json!(summaries));

    let contents: Vec<&str> = memos.iter().map(|memo| memo.content.as_str()).collect();
    payload.insert(
        "context".into(),
        Value::String(format!("Search result:\n{}", contents.join(", "))),
    );

    Value::Object(payload)
}

/// Build the `create_memo` result.
pub(crate) fn create_payload(memo: &Memo) -> Value {
    json!({
        "status": "ok",
        "name": memo.name,
        "memo": MemoSummary::from(memo),
    })
}

/// Build the `get_memo` result carrying the full memo.
pub(crate) fn memo_payload(memo: &Memo) -> Value {
    json!({ "memo": memo })
}

/// Build the `list_memo_tags` result.
pub(crate) fn tags_payload(parent: &str, visibility: Visibility, tags: BTreeSet<String>) -> Value {
    json!({
        "parent": parent,
        "visibility": visibility,
        "tags": tags,
    })
}

/// Describe an upstream failure as structured JSON.
pub(crate) fn failure_payload(error: &MemosError) -> Value {
    let mut detail = Map::new();
    detail.insert("kind".into(), Value::String(error.kind().into()));
    if let Some(operation) = error.operation() {
        detail.insert("operation".into(), Value::String(operation.into()));
    }
    if let Some(status) = error.status() {
        detail.insert("status".into(), Value::from(status.as_u16()));
    }
    detail.insert("message".into(), Value::String(error.to_string()));
    json!({ "error": Value::Object(detail) })
}

/// Convert an upstream failure into a failed tool result.
pub(crate) fn tool_failure(error: &MemosError) -> CallToolResult {
    tracing::warn!(kind = error.kind(), error = %error, "Memos call failed");
    CallToolResult::structured_error(failure_payload(error))
}

/// Format the static visibility manifest returned via MCP resources.
pub(crate) fn visibilities_payload() -> String {
    let values: Vec<&str> = Visibility::ALL.iter().map(|v| v.as_str()).collect();
    serialize_json(
        &json!({
            "visibilities": values,
            "default": Visibility::default(),
        }),
        "visibilities",
    )
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Connection settings exposed through the `settings` resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SettingsSnapshot {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) base_url: String,
    pub(crate) token_configured: bool,
}

/// Reachability report exposed through the `health` resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthSnapshot {
    pub(crate) reachable: bool,
    pub(crate) base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) profile: Option<WorkspaceProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<Value>,
}

impl HealthSnapshot {
    pub(crate) fn from_profile(
        base_url: String,
        profile: Result<WorkspaceProfile, MemosError>,
    ) -> Self {
        match profile {
            Ok(profile) => Self {
                reachable: true,
                base_url,
                profile: Some(profile),
                error: None,
            },
            Err(error) => Self {
                // Any HTTP answer, even a rejection, means the server is up.
                reachable: error.status().is_some(),
                base_url,
                profile: None,
                error: failure_payload(&error).get("error").cloned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn memo(name: &str, content: &str) -> Memo {
        Memo {
            name: name.into(),
            content: content.into(),
            visibility: "PUBLIC".into(),
            ..Memo::default()
        }
    }

    #[test]
    fn search_payload_keeps_order_and_builds_context() {
        let payload = search_payload(
            "rust",
            &[memo("memos/2", "b"), memo("memos/3", ""), memo("memos/1", "a")],
        );
        assert_eq!(payload["count"], 3);
        assert_eq!(payload["memos"][0]["name"], "memos/2");
        assert_eq!(payload["memos"][2]["name"], "memos/1");
        assert_eq!(payload["context"], "Search result:\nb, , a");
    }

    #[test]
    fn empty_search_still_carries_context() {
        let payload = search_payload("nothing", &[]);
        assert_eq!(payload["count"], 0);
        assert_eq!(payload["memos"], json!([]));
        assert_eq!(payload["context"], "Search result:\n");
    }

    #[test]
    fn failure_payload_carries_status_and_operation() {
        let error = MemosError::from_status(
            "get memo",
            StatusCode::NOT_FOUND,
            "memo not found".into(),
        );
        let payload = failure_payload(&error);
        assert_eq!(payload["error"]["kind"], "not_found");
        assert_eq!(payload["error"]["operation"], "get memo");
        assert_eq!(payload["error"]["status"], 404);

        let result = tool_failure(&error);
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn visibilities_payload_is_valid_json() {
        let value: Value =
            serde_json::from_str(&visibilities_payload()).expect("valid visibilities JSON");
        assert_eq!(value["default"], "PUBLIC");
        assert_eq!(value["visibilities"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn health_snapshot_distinguishes_rejection_from_outage() {
        let rejected = HealthSnapshot::from_profile(
            "http://localhost:8080/".into(),
            Err(MemosError::from_status(
                "workspace profile",
                StatusCode::UNAUTHORIZED,
                String::new(),
            )),
        );
        assert!(rejected.reachable);
        assert!(rejected.error.is_some());

        let healthy = HealthSnapshot::from_profile(
            "http://localhost:8080/".into(),
            Ok(WorkspaceProfile::default()),
        );
        assert!(healthy.reachable);
        assert!(healthy.error.is_none());
    }
}
