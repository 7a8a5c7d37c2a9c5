use crate::utils::text::truncate_utf8_prefix;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

const DEFAULT_REDACTION: &str = "[REDACTED]";
const INLINE_REDACTION: &str = "***REDACTED***";

static SENSITIVE_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "password",
        "bearertoken",
        "accesstoken",
        "token",
        "authorization",
        "secret",
    ]
    .into_iter()
    .collect()
});

static INLINE_REDACTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b")
                .expect("inline redaction regex"),
            INLINE_REDACTION,
        ),
        (
            Regex::new(r"\b(Bearer)\s+([A-Za-z0-9._~-]{10,})\b").expect("inline redaction regex"),
            "$1 ***REDACTED***",
        ),
        (
            Regex::new(r#"\b(password|accessToken|bearerToken|token)\b\s*([:=])\s*([^\s"'`,}]+)"#)
                .expect("inline redaction regex"),
            "$1$2***REDACTED***",
        ),
    ]
});

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_lowercase().replace(['_', '-'], "");
    if normalized.is_empty() {
        return false;
    }
    SENSITIVE_KEYS.contains(normalized.as_str()) || normalized.ends_with("token")
}

pub fn redact_text(value: &str, max_length: usize) -> String {
    let mut out = value.to_string();
    for (re, replacement) in INLINE_REDACTION_PATTERNS.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *replacement).to_string();
        }
    }
    if out.len() <= max_length {
        return out;
    }
    format!("{}...", truncate_utf8_prefix(&out, max_length))
}

pub fn redact_object(value: &Value, max_length: usize) -> Value {
    match value {
        Value::String(text) => Value::String(redact_text(text, max_length)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_object(item, max_length))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, entry) in map.iter() {
                if is_sensitive_key(key) && !entry.is_null() {
                    out.insert(key.clone(), Value::String(DEFAULT_REDACTION.to_string()));
                    continue;
                }
                out.insert(key.clone(), redact_object(entry, max_length));
            }
            Value::Object(out)
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_credential_fields() {
        let input = serde_json::json!({
            "loginName": "jane",
            "password": "hunter22",
            "bearerToken": "abc",
            "nested": {"accessToken": "xyz", "lang": "nl"}
        });
        let out = redact_object(&input, usize::MAX);
        assert_eq!(out["loginName"], "jane");
        assert_eq!(out["password"], DEFAULT_REDACTION);
        assert_eq!(out["bearerToken"], DEFAULT_REDACTION);
        assert_eq!(out["nested"]["accessToken"], DEFAULT_REDACTION);
        assert_eq!(out["nested"]["lang"], "nl");
    }

    #[test]
    fn redacts_inline_bearer_header() {
        let text = redact_text("Authorization: Bearer abcdefghijklmnop", usize::MAX);
        assert_eq!(text, "Authorization: Bearer ***REDACTED***");
    }

    #[test]
    fn truncates_long_text() {
        let text = redact_text("abcdefghij", 4);
        assert_eq!(text, "abcd...");
    }
}
