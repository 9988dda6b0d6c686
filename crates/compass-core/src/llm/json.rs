//! Pulling JSON payloads out of free-form model replies.
//!
//! Models wrap JSON in prose or markdown fences. These helpers locate the
//! payload, then hand it to serde.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Returns the body of the first fenced code block, if any.
pub fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip the info string (e.g. `json`) up to the end of the line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Locates a JSON object: the span from the first `{` to the last `}`.
///
/// A fenced block is searched first when present.
pub fn extract_json_object(text: &str) -> Option<&str> {
    extract_delimited(text, '{', '}')
}

/// Locates a JSON array: the span from the first `[` to the last `]`.
pub fn extract_json_array(text: &str) -> Option<&str> {
    extract_delimited(text, '[', ']')
}

fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    if let Some(found) = fenced_block(text).and_then(|block| span(block, open, close)) {
        return Some(found);
    }
    span(text, open, close)
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the JSON object embedded in `text`.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    let raw = extract_json_object(text)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "llm.json.object_rejected");
            None
        }
    }
}

/// Parses the JSON array embedded in `text`.
pub fn parse_array<T: DeserializeOwned>(text: &str) -> Option<Vec<T>> {
    let raw = extract_json_array(text)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "llm.json.array_rejected");
            None
        }
    }
}

/// Parses an object, falling back when the reply carries none.
pub fn parse_object_or<T: DeserializeOwned>(text: &str, fallback: impl FnOnce() -> T) -> T {
    parse_object(text).unwrap_or_else(|| {
        tracing::warn!("model reply did not contain a usable JSON object; using fallback");
        fallback()
    })
}

/// Parses an array, falling back when the reply carries none.
pub fn parse_array_or<T: DeserializeOwned>(text: &str, fallback: impl FnOnce() -> Vec<T>) -> Vec<T> {
    parse_array(text).unwrap_or_else(|| {
        tracing::warn!("model reply did not contain a usable JSON array; using fallback");
        fallback()
    })
}

/// Field deserializer accepting `"a"`, `["a", "b"]` or `null`.
pub fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}

/// Field deserializer for model-supplied scores: numbers, numeric strings
/// (`"7"`, `"7/10"`, `"85%"`) or `null`.
pub fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Nothing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Some(n),
        Raw::Text(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse().ok()
        }
        Raw::Nothing(()) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Score {
        score: u8,
    }

    #[test]
    fn test_fenced_block() {
        let reply = "Here you go:\n```json\n{\"score\": 7}\n```\nThanks";
        assert_eq!(fenced_block(reply), Some("{\"score\": 7}"));
        assert_eq!(fenced_block("no fences"), None);
    }

    #[test]
    fn test_object_in_prose() {
        let reply = "Sure! {\"score\": 4} Hope that helps.";
        assert_eq!(extract_json_object(reply), Some("{\"score\": 4}"));
        assert_eq!(parse_object::<Score>(reply), Some(Score { score: 4 }));
    }

    #[test]
    fn test_array_spans_first_to_last_bracket() {
        let reply = "Roles: [{\"a\": [1]}, {\"b\": 2}] done";
        assert_eq!(extract_json_array(reply), Some("[{\"a\": [1]}, {\"b\": 2}]"));
    }

    #[test]
    fn test_fallbacks() {
        let value = parse_object_or("nothing here", || Score { score: 5 });
        assert_eq!(value, Score { score: 5 });

        let list: Vec<String> = parse_array_or("[not json]", || vec!["x".to_string()]);
        assert_eq!(list, vec!["x".to_string()]);
    }

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "string_or_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "lenient_number")]
        rating: Option<f64>,
    }

    #[test]
    fn test_lenient_fields() {
        let loose: Loose = serde_json::from_str(r#"{"items": "one", "rating": "8/10"}"#).unwrap();
        assert_eq!(loose.items, vec!["one"]);
        assert_eq!(loose.rating, Some(8.0));

        let loose: Loose = serde_json::from_str(r#"{"items": null, "rating": 6.5}"#).unwrap();
        assert!(loose.items.is_empty());
        assert_eq!(loose.rating, Some(6.5));

        let loose: Loose = serde_json::from_str("{}").unwrap();
        assert_eq!(loose.rating, None);
    }
}
