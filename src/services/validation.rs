use crate::constants::api::OBJECT_ID_LENGTH;
use crate::constants::auth::{DEFAULT_LANGUAGE, LANGUAGES};
use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::NodeError;
use crate::utils::suggest::suggest;
use serde_json::Value;

#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    /// Trimmed, non-blank text. Non-string scalars are rendered the way the
    /// host would coerce them.
    pub fn ensure_string(&self, value: Option<&Value>, label: &str) -> Result<String, NodeError> {
        let text = match value {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        };
        if text.is_empty() {
            return Err(NodeError::invalid_input(format!("{} cannot be empty", label)));
        }
        Ok(text)
    }

    pub fn ensure_optional_string(&self, value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// 24 hexadecimal characters, either case.
    pub fn ensure_object_id(&self, value: Option<&Value>, label: &str) -> Result<String, NodeError> {
        let raw = value.and_then(Value::as_str).unwrap_or("");
        if is_object_id(raw) {
            return Ok(raw.to_string());
        }
        Err(NodeError::invalid_input(format!(
            "Invalid {}. Expected 24 hexadecimal characters (MongoDB ObjectID format)",
            label
        ))
        .with_details(serde_json::json!({ "value": raw })))
    }

    /// Accepts an object as-is or parses a JSON string.
    pub fn parse_json_parameter(&self, value: Option<&Value>, name: &str) -> Result<Value, NodeError> {
        match value {
            None | Some(Value::Null) => Err(NodeError::invalid_input(format!("{} is required", name))),
            Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|err| {
                NodeError::invalid_input(format!("Invalid JSON in {}", name)).with_description(
                    format!("Please check your JSON syntax. Error: {}", err),
                )
            }),
            Some(other) => Ok(other.clone()),
        }
    }

    pub fn ensure_language(&self, value: Option<&str>) -> Result<String, NodeError> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(language) = raw else {
            return Ok(DEFAULT_LANGUAGE.to_string());
        };
        let normalized = language.to_lowercase();
        if LANGUAGES.contains(&normalized.as_str()) {
            return Ok(normalized);
        }
        Err(NodeError::invalid_input(format!(
            "Unsupported language \"{}\". Use one of: {}",
            language,
            LANGUAGES.join(", ")
        )))
    }

    pub fn ensure_one_of(
        &self,
        value: &str,
        label: &str,
        allowed: &[&str],
    ) -> Result<String, NodeError> {
        if allowed.contains(&value) {
            return Ok(value.to_string());
        }
        let mut err = NodeError::invalid_input(format!("Invalid {}: {}", label, value));
        let hints = suggest(value, allowed, SUGGESTION_LIMIT);
        if !hints.is_empty() {
            err = err.with_description(format!("Did you mean: {}?", hints.join(", ")));
        }
        Err(err)
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_object_id(value: &str) -> bool {
    value.len() == OBJECT_ID_LENGTH && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_id_shape() {
        assert!(is_object_id("507f1f77bcf86cd799439011"));
        assert!(is_object_id("507F1F77BCF86CD799439011"));
        assert!(!is_object_id("507f1f77bcf86cd79943901"));
        assert!(!is_object_id("507f1f77bcf86cd79943901z"));
        assert!(!is_object_id(""));
    }

    #[test]
    fn object_id_error_names_the_field() {
        let err = Validation::new()
            .ensure_object_id(Some(&json!("abc")), "User ID")
            .unwrap_err();
        assert_eq!(
            err.message,
            "Invalid User ID. Expected 24 hexadecimal characters (MongoDB ObjectID format)"
        );
    }

    #[test]
    fn blank_strings_are_rejected() {
        let validation = Validation::new();
        let err = validation
            .ensure_string(Some(&json!("   ")), "Group ID")
            .unwrap_err();
        assert_eq!(err.message, "Group ID cannot be empty");
        assert_eq!(
            validation.ensure_string(Some(&json!(" g1 ")), "Group ID").unwrap(),
            "g1"
        );
        assert!(validation.ensure_string(None, "Group ID").is_err());
    }

    #[test]
    fn json_parameter_accepts_string_or_object() {
        let validation = Validation::new();
        assert_eq!(
            validation
                .parse_json_parameter(Some(&json!("{\"a\":1}")), "Content Body")
                .unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            validation
                .parse_json_parameter(Some(&json!({"a": 1})), "Content Body")
                .unwrap(),
            json!({"a": 1})
        );
        let err = validation
            .parse_json_parameter(Some(&json!("{oops")), "Content Body")
            .unwrap_err();
        assert_eq!(err.message, "Invalid JSON in Content Body");
        let err = validation.parse_json_parameter(None, "Content Body").unwrap_err();
        assert_eq!(err.message, "Content Body is required");
    }

    #[test]
    fn language_defaults_and_rejects_unknown() {
        let validation = Validation::new();
        assert_eq!(validation.ensure_language(None).unwrap(), "en");
        assert_eq!(validation.ensure_language(Some("NL")).unwrap(), "nl");
        assert!(validation.ensure_language(Some("de")).is_err());
    }

    #[test]
    fn one_of_suggests_close_values() {
        let err = Validation::new()
            .ensure_one_of("formvalue", "origin", &["formvalues", "contents"])
            .unwrap_err();
        assert_eq!(err.description.as_deref(), Some("Did you mean: formvalues?"));
    }
}
