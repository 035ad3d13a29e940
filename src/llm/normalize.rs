use serde_json::Value;

/// A single extraction rule. Returns `None` when the payload does not carry
/// the shape this rule understands, letting the next rule run.
type Extractor = fn(&Value) -> Option<String>;

/// Extraction rules in priority order. Supporting a new provider response
/// shape means appending a rule here.
const EXTRACTORS: &[Extractor] = &[from_reply, from_raw_text, from_choices, from_output];

/// Extracts the canonical reply text from a raw provider payload. Tries each
/// rule in order and falls back to JSON-stringifying the whole payload, so
/// the result is always a non-empty string and this never fails.
pub fn normalize(raw: &Value) -> String {
    if let Value::String(text) = raw {
        return text.clone();
    }
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(raw))
        .unwrap_or_else(|| raw.to_string())
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn from_reply(raw: &Value) -> Option<String> {
    raw.get("reply").map(value_to_string)
}

fn from_raw_text(raw: &Value) -> Option<String> {
    raw.get("raw")?.get("text").map(value_to_string)
}

fn from_choices(raw: &Value) -> Option<String> {
    let first = raw.get("choices")?.get(0)?;
    if let Some(content) = first.get("message").and_then(|m| m.get("content")) {
        return Some(value_to_string(content));
    }
    first.get("text").map(value_to_string)
}

fn from_output(raw: &Value) -> Option<String> {
    let first = raw.get("output")?.as_array()?.first()?;
    if let Some(text) = first.as_str() {
        return Some(text.to_string());
    }
    if let Some(content) = first.get("content") {
        return Some(value_to_string(content));
    }
    first.get("candidates")?.get(0)?.get("content").map(value_to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(normalize(&json!("just text")), "just text");
    }

    #[test]
    fn reply_field_wins_over_everything() {
        let raw = json!({
            "reply": "from reply",
            "choices": [{"message": {"content": "from choices"}}]
        });
        assert_eq!(normalize(&raw), "from reply");
    }

    #[test]
    fn non_string_reply_is_stringified() {
        let raw = json!({"reply": {"nested": true}});
        assert_eq!(normalize(&raw), r#"{"nested":true}"#);
    }

    #[test]
    fn nested_raw_text() {
        let raw = json!({"raw": {"text": "inner"}});
        assert_eq!(normalize(&raw), "inner");
    }

    #[test]
    fn openai_message_content() {
        let raw = json!({"choices": [{"message": {"content": "hello"}}]});
        assert_eq!(normalize(&raw), "hello");
    }

    #[test]
    fn openai_completion_text() {
        let raw = json!({"choices": [{"text": "legacy"}]});
        assert_eq!(normalize(&raw), "legacy");
    }

    #[test]
    fn output_array_of_strings() {
        let raw = json!({"output": ["first", "second"]});
        assert_eq!(normalize(&raw), "first");
    }

    #[test]
    fn output_element_content_field() {
        let raw = json!({"output": [{"content": "inner content"}]});
        assert_eq!(normalize(&raw), "inner content");
    }

    #[test]
    fn output_element_candidates() {
        let raw = json!({"output": [{"candidates": [{"content": "candidate text"}]}]});
        assert_eq!(normalize(&raw), "candidate text");
    }

    #[test]
    fn unknown_shape_falls_back_to_stringify() {
        let raw = json!({"something": "else"});
        let text = normalize(&raw);
        assert!(!text.is_empty());
        assert_eq!(text, r#"{"something":"else"}"#);
    }

    #[test]
    fn empty_object_still_yields_text() {
        assert_eq!(normalize(&json!({})), "{}");
    }
}
