//! Tool handlers for the MCP server.

use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::memos::Visibility;

pub mod create;
pub mod get;
pub mod search;
pub mod tags;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    parse_arguments_value(value)
}

/// Deserialize arguments represented as a JSON value into the target type.
pub(crate) fn parse_arguments_value<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Move `alias` onto `canonical` unless the canonical key is already present.
pub(crate) fn move_alias(map: &mut JsonObject, alias: &str, canonical: &str) {
    if let Some(value) = map.remove(alias) {
        if map.contains_key(canonical) {
            tracing::debug!(alias, canonical, "Alias ignored because canonical key provided");
        } else {
            map.insert(canonical.to_string(), value);
        }
    }
}

/// Resolve an optional visibility argument, defaulting to `PUBLIC`.
pub(crate) fn parse_visibility(value: Option<String>) -> Result<Visibility, McpError> {
    match value {
        None => Ok(Visibility::default()),
        Some(raw) => raw.parse().map_err(|()| {
            McpError::invalid_params(
                format!("`visibility` must be one of PUBLIC|PROTECTED|PRIVATE (got '{raw}')"),
                None,
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn move_alias_respects_canonical_key() {
        let mut map = json!({ "keyword": "a", "key_word": "b" })
            .as_object()
            .cloned()
            .expect("object");
        move_alias(&mut map, "keyword", "key_word");
        assert_eq!(map.get("key_word"), Some(&json!("b")));
        assert!(!map.contains_key("keyword"));

        let mut map = json!({ "keyword": "a" }).as_object().cloned().expect("object");
        move_alias(&mut map, "keyword", "key_word");
        assert_eq!(map.get("key_word"), Some(&json!("a")));
    }

    #[test]
    fn parse_visibility_defaults_and_validates() {
        assert_eq!(parse_visibility(None).expect("default"), Visibility::Public);
        assert_eq!(
            parse_visibility(Some("private".into())).expect("private"),
            Visibility::Private
        );
        let error = parse_visibility(Some("friends".into())).unwrap_err();
        assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }
}
