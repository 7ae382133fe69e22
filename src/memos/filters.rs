//! Builders for Memos filter expressions and resource names.

use super::types::Visibility;

/// Parent that scopes a tag listing to every memo.
pub const ALL_MEMOS_PARENT: &str = "memos/-";

const MEMO_PREFIX: &str = "memos/";

/// Filter matching non-archived memos whose content contains `keyword`.
pub fn content_search_filter(keyword: &str) -> String {
    format!(
        "row_status == 'NORMAL' && content_search == [{}]",
        quote_literal(keyword)
    )
}

/// Filter restricting tag listings to memos with the given visibility.
pub fn visibility_filter(visibility: Visibility) -> String {
    format!("visibilities == [{}]", quote_literal(visibility.as_str()))
}

/// Quote a string literal for the filter language.
///
/// Backslashes and single quotes are escaped, and control characters are written as escape
/// sequences so the literal always stays on one line.
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' | '\'' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch if ch.is_control() => quoted.push_str(&format!("\\u{:04x}", u32::from(ch))),
            ch => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Normalize a memo reference into `memos/{id}`.
///
/// Accepts either a full resource name or a bare identifier. Returns `None` when the id is
/// empty or contains path separators.
pub fn normalize_memo_name(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    let id = trimmed.strip_prefix(MEMO_PREFIX).unwrap_or(trimmed);
    if !is_valid_segment(id) || id == "-" {
        return None;
    }
    Some(format!("{MEMO_PREFIX}{id}"))
}

/// Validate a tag parent, which is either a memo name or the `memos/-` wildcard.
pub fn normalize_parent(parent: &str) -> Option<String> {
    let trimmed = parent.trim();
    if trimmed == ALL_MEMOS_PARENT {
        return Some(ALL_MEMOS_PARENT.to_string());
    }
    let id = trimmed.strip_prefix(MEMO_PREFIX)?;
    is_valid_segment(id).then(|| trimmed.to_string())
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.contains('/')
        && !segment.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_filter_matches_memos_syntax() {
        assert_eq!(
            content_search_filter("rust"),
            "row_status == 'NORMAL' && content_search == ['rust']"
        );
    }

    #[test]
    fn literals_escape_quotes_and_backslashes() {
        assert_eq!(quote_literal("it's"), r"'it\'s'");
        assert_eq!(quote_literal(r"a\b"), r"'a\\b'");
        assert_eq!(
            content_search_filter("x'] || true || ['"),
            r"row_status == 'NORMAL' && content_search == ['x\'] || true || [\'']"
        );
    }

    #[test]
    fn literals_escape_control_characters() {
        assert_eq!(quote_literal("line one\nline two"), r"'line one\nline two'");
        assert_eq!(quote_literal("a\tb\r"), r"'a\tb\r'");
        assert_eq!(quote_literal("bell\u{7}"), r"'bell\u0007'");
        assert!(!content_search_filter("multi\nline").contains('\n'));
    }

    #[test]
    fn visibility_filter_uses_wire_names() {
        assert_eq!(
            visibility_filter(Visibility::Protected),
            "visibilities == ['PROTECTED']"
        );
    }

    #[test]
    fn memo_names_are_normalized() {
        assert_eq!(normalize_memo_name("42").as_deref(), Some("memos/42"));
        assert_eq!(normalize_memo_name(" memos/42 ").as_deref(), Some("memos/42"));
        assert_eq!(normalize_memo_name("memos/"), None);
        assert_eq!(normalize_memo_name("memos/-"), None);
        assert_eq!(normalize_memo_name("users/1/x"), None);
        assert_eq!(normalize_memo_name(""), None);
    }

    #[test]
    fn parents_accept_wildcard_and_memo_names() {
        assert_eq!(normalize_parent("memos/-").as_deref(), Some("memos/-"));
        assert_eq!(normalize_parent("memos/9").as_deref(), Some("memos/9"));
        assert_eq!(normalize_parent("9"), None);
        assert_eq!(normalize_parent("memos/a/b"), None);
    }
}
