//! JSON schema builders for MCP tools.

use crate::mcp::handlers::search::MAX_SEARCH_LIMIT;
use crate::memos::{ALL_MEMOS_PARENT, Visibility};
use serde_json::{Map, Value, json};

/// Build the schema describing the `search_memo` tool input.
pub(crate) fn search_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "key_word".into(),
        string_schema("The key words to search for in the memo content."),
    );
    properties.insert("keyword".into(), string_schema("Alias for `key_word`."));
    properties.insert("query".into(), string_schema("Alias for `key_word`."));

    let mut limit_schema = Map::new();
    limit_schema.insert("type".into(), Value::String("integer".into()));
    limit_schema.insert(
        "description".into(),
        Value::String("Maximum number of memos to return".into()),
    );
    limit_schema.insert("minimum".into(), Value::Number(1.into()));
    limit_schema.insert("maximum".into(), Value::Number(MAX_SEARCH_LIMIT.into()));
    properties.insert("limit".into(), Value::Object(limit_schema));

    let mut schema = finalize_object_schema(properties, &[]);
    require_one_of(&mut schema, &["key_word", "keyword", "query"]);
    schema.insert(
        "examples".into(),
        json!([{ "key_word": "meeting notes" }, { "key_word": "rust", "limit": 5 }]),
    );
    schema
}

/// Build the schema describing the `create_memo` tool input.
pub(crate) fn create_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("content".into(), string_schema("The content of the memo."));
    properties.insert(
        "visibility".into(),
        visibility_schema("The visibility of the memo."),
    );
    finalize_object_schema(properties, &["content"])
}

/// Build the schema describing the `get_memo` tool input.
pub(crate) fn get_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "name".into(),
        string_schema("The name of the memo. Format: memos/{id}"),
    );
    properties.insert(
        "id".into(),
        json!({
            "type": ["string", "integer"],
            "description": "Memo id, used when `name` is absent.",
        }),
    );
    let mut schema = finalize_object_schema(properties, &[]);
    require_one_of(&mut schema, &["name", "id"]);
    schema
}

/// Build the schema describing the `list_memo_tags` tool input.
pub(crate) fn list_tags_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();

    let mut parent_schema = Map::new();
    parent_schema.insert("type".into(), Value::String("string".into()));
    parent_schema.insert(
        "description".into(),
        Value::String(
            "The parent, who owns the tags. Format: memos/{id}. Use \"memos/-\" to list all tags."
                .into(),
        ),
    );
    parent_schema.insert("default".into(), Value::String(ALL_MEMOS_PARENT.into()));
    properties.insert("parent".into(), Value::Object(parent_schema));

    properties.insert(
        "visibility".into(),
        visibility_schema("The visibility of the tags."),
    );

    finalize_object_schema(properties, &[])
}

fn visibility_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert(
        "enum".into(),
        Value::Array(
            Visibility::ALL
                .iter()
                .map(|variant| Value::String(variant.as_str().into()))
                .collect(),
        ),
    );
    schema.insert(
        "default".into(),
        Value::String(Visibility::default().as_str().into()),
    );
    Value::Object(schema)
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

/// Require at least one of `keys`, for tools that accept aliased arguments.
fn require_one_of(schema: &mut Map<String, Value>, keys: &[&str]) {
    let alternatives = keys.iter().map(|key| json!({ "required": [key] })).collect();
    schema.insert("anyOf".into(), Value::Array(alternatives));
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
