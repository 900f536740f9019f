//! Recovery of a JSON object from free-form model output.
//!
//! Models are asked for bare JSON but regularly wrap it in a Markdown fence
//! or surround it with chatter. Extraction scans the text for `{...}` spans
//! and keeps the first one that parses as a JSON object.

use log::debug;
use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Remove a Markdown code fence wrapping the whole text.
///
/// Only a fence at the very start (optionally tagged, e.g. ```` ```json ````)
/// or at the very end is removed; backticks elsewhere are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let rest = rest.trim_start_matches('`');
        // Language hint runs up to the first whitespace or brace
        let tag_len = rest
            .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
            .unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest.trim_end_matches('`');
    }

    body.trim()
}

/// Length of the object opening at the start of `text`, ignoring braces
/// inside strings. `None` if it never closes.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// First balanced `{...}` span that parses as a JSON object.
///
/// Spans that are not JSON (e.g. `{dish}` in prose) are skipped along with
/// everything nested in them. An unclosed span ends the scan.
fn first_json_object(text: &str) -> Option<&str> {
    let mut from = 0;

    while let Some(found) = text[from..].find('{') {
        let start = from + found;
        let end = start + balanced_len(&text[start..])?;
        let candidate = &text[start..end];

        if serde_json::from_str::<Map<String, Value>>(candidate).is_ok() {
            return Some(candidate);
        }
        debug!("Skipping brace span that is not a JSON object: {}", candidate);
        from = end;
    }

    None
}

/// Reduce raw model output to the text of a single JSON object.
///
/// Returns `None` when no `{...}` span can be found at all.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    if let Some(object) = first_json_object(raw) {
        return Some(object);
    }

    // Nothing parses (usually truncated output): fall back to the outermost
    // brace pair of the unfenced text and let the parser report why.
    let unfenced = strip_code_fence(raw);
    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if start < end {
        debug!("No complete JSON object found, using outermost brace span");
        Some(&unfenced[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_passes_through() {
        let raw = "  {\"name\": \"Pad Thai\"}\n";
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"Pad Thai\"}"));
    }

    #[test]
    fn test_tagged_fence() {
        let raw = "```json\n{\"name\": \"Pad Thai\"}\n```";
        assert_eq!(strip_code_fence(raw), "{\"name\": \"Pad Thai\"}");
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"Pad Thai\"}"));
    }

    #[test]
    fn test_untagged_fence_and_tag_on_same_line() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_lone_trailing_fence() {
        let raw = "{\"name\": \"Pad Thai\"}\n```";
        assert_eq!(strip_code_fence(raw), "{\"name\": \"Pad Thai\"}");
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"Pad Thai\"}"));
    }

    #[test]
    fn test_fence_in_trailing_prose_is_not_stripped() {
        let raw = "{\"name\": \"Pad Thai\"}\n\nTip: run ```enjoy``` later";
        assert_eq!(strip_code_fence(raw), raw);
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"Pad Thai\"}"));
    }

    #[test]
    fn test_backticks_inside_string_value() {
        let raw = r#"{"instructions": "步骤 ```1``` 炖。"}"#;
        assert_eq!(extract_json_object(raw), Some(raw));
    }

    #[test]
    fn test_non_json_braces_before_object_are_skipped() {
        let raw = "The recipe for {麻婆豆腐}: {\"ingredients\": []}";
        assert_eq!(extract_json_object(raw), Some("{\"ingredients\": []}"));
    }

    #[test]
    fn test_prose_around_object() {
        let raw = "Sure! Here is your recipe: {\"name\": \"Borscht\", \"ingredients\": []} Enjoy! :}";
        assert_eq!(
            extract_json_object(raw),
            Some("{\"name\": \"Borscht\", \"ingredients\": []}")
        );
    }

    #[test]
    fn test_prose_around_fence() {
        let raw = "好的！\n```json\n{\"name\": \"麻婆豆腐\"}\n```\n祝你做菜愉快。";
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"麻婆豆腐\"}"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"{"instructions": "Use a {large} pot \"}\" carefully", "x": {"y": 1}} trailing"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"instructions": "Use a {large} pot \"}\" carefully", "x": {"y": 1}}"#)
        );
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_json_object("I don't know this dish."), None);
        assert_eq!(extract_json_object("} backwards {"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_truncated_object_falls_back_to_outer_span() {
        let raw = "{\"name\": \"x\", \"nested\": {\"a\": 1}";
        assert_eq!(extract_json_object(raw), Some("{\"name\": \"x\", \"nested\": {\"a\": 1}"));
    }
}
