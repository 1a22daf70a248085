//! Result envelope helpers shared by every tool.
//!
//! Every envelope carries exactly one text block. Success text starts with
//! `Success:` and error text with `Error:`, and `isError` is always set, so
//! clients that only read the text can still tell the two apart.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::warn;

/// Prefix of every success message.
pub const SUCCESS_PREFIX: &str = "Success:";

/// Prefix of every error message.
pub const ERROR_PREFIX: &str = "Error:";

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(format!(
        "{} {}",
        ERROR_PREFIX, message
    ))])
}

/// Create a success result: a one-line summary followed by the relevant
/// part of the remote response.
pub fn success_result(summary: &str, payload: &Value) -> CallToolResult {
    let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::success(vec![Content::text(format!(
        "{} {}\n{}",
        SUCCESS_PREFIX, summary, body
    ))])
}

/// First string found at any of the JSON `pointers` in `value`.
pub fn find_str<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .find_map(|p| value.pointer(p).and_then(Value::as_str))
}

/// The text of the envelope's single content block.
#[cfg(test)]
pub fn text_of(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_result_shape() {
        let result = error_result("quota exceeded");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
        assert_eq!(text_of(&result), "Error: quota exceeded");
    }

    #[test]
    fn test_success_result_embeds_payload() {
        let result = success_result("created record rec1", &json!({"record_id": "rec1"}));
        assert_eq!(result.is_error, Some(false));
        let text = text_of(&result);
        assert!(text.starts_with("Success: created record rec1\n"));
        assert!(text.contains("\"record_id\": \"rec1\""));
    }

    #[test]
    fn test_serialized_envelope_uses_is_error() {
        let value = serde_json::to_value(error_result("boom")).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
    }

    #[test]
    fn test_find_str_tries_pointers_in_order() {
        let record = json!({"id": "rec1", "nested": {"record_id": "rec2"}});
        assert_eq!(find_str(&record, &["/record_id", "/id"]), Some("rec1"));
        assert_eq!(
            find_str(&record, &["/nested/record_id", "/id"]),
            Some("rec2")
        );
        assert_eq!(find_str(&record, &["/missing"]), None);
    }
}
