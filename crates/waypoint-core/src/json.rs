//! Helpers for pulling structured data out of free-form model replies.

use serde_json::Value;

/// Returns the first JSON object or array embedded in `text`.
///
/// Replies often wrap the payload in prose or a fenced code block; the scan
/// tries every `{` / `[` in order and keeps the first one that parses.
pub fn extract_json_from_str(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed)
        && (value.is_object() || value.is_array())
    {
        return Some(value);
    }

    trimmed
        .char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&trimmed[start..])
                .into_iter::<Value>()
                .next()
                .and_then(Result::ok)
        })
}

/// Like [`extract_json_from_str`] but only accepts an object.
pub fn extract_object_from_str(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    trimmed
        .char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&trimmed[start..])
                .into_iter::<Value>()
                .next()
                .and_then(Result::ok)
                .filter(Value::is_object)
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_object() {
        let value = extract_json_from_str(r#"{"can_proceed": true}"#).unwrap();
        assert_eq!(value, json!({"can_proceed": true}));
    }

    #[test]
    fn test_fenced_block_with_prose() {
        let reply = "Sure, here you go:\n```json\n{\"a\": [1, 2]}\n```\nAnything else?";
        assert_eq!(extract_json_from_str(reply).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_skips_unbalanced_prefix() {
        let reply = "use {braces} carefully: {\"ok\": 1}";
        assert_eq!(extract_object_from_str(reply).unwrap(), json!({"ok": 1}));
    }

    #[test]
    fn test_array_payload() {
        let reply = "[{\"intent\": \"book flight\"}]";
        assert!(extract_json_from_str(reply).unwrap().is_array());
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json_from_str("I cannot help with that").is_none());
        assert!(extract_object_from_str("[1, 2, 3]").is_none());
    }
}
