//! Raw input coercion.
//!
//! Every value reaching the engine starts life as one line of text, whether
//! it came from a flag, an `-O` override, or an interactive prompt. This
//! module turns that text into a typed JSON value according to the field
//! type. The rules here are relied on by every add/update flow; in
//! particular the checkbox truthy set is the canonical boolean rule for the
//! whole CLI and must not drift.

use anyhow::{Context, Result, anyhow};
use serde_json::{Number, Value};

use super::{FieldType, SelectOption};
use crate::option_types::payload::value_to_string;

/// Raw input that means "send an explicit null to clear this field".
///
/// Only text, textarea, number, and select fields honor it; password and
/// code-editor content is taken verbatim.
const LITERAL_NULL: &str = "null";

/// The canonical truthy rule for checkbox fields and boolean-ish CLI input.
///
/// Exactly `"on"`, `"true"`, `"1"`, and the empty string are true; every
/// other string (including `"off"`, `"false"`, `"yes"`) is false.
pub fn is_truthy(raw: &str) -> bool {
    matches!(raw, "on" | "true" | "1" | "")
}

/// Whether raw input asks for an explicit clear.
pub fn is_clear_request(raw: &str) -> bool {
    raw == LITERAL_NULL
}

/// Coerce one line of raw input into a typed value for the given field type.
///
/// Returns the human-readable reason on failure; the engine decides whether
/// that failure is fatal (required field) or means "leave the field out"
/// (optional field). Select fields are matched separately via
/// [`match_select`] because they need the resolved option list.
pub fn coerce(raw: &str, field_type: FieldType) -> Result<Value, String> {
    match field_type {
        FieldType::Checkbox => Ok(Value::Bool(is_truthy(raw))),
        FieldType::Number => {
            if is_clear_request(raw) {
                return Ok(Value::Null);
            }
            parse_number(raw).ok_or_else(|| format!("'{raw}' is not a number"))
        }
        FieldType::Text | FieldType::Textarea | FieldType::Select => {
            if is_clear_request(raw) {
                Ok(Value::Null)
            } else {
                Ok(Value::String(raw.to_string()))
            }
        }
        // Secrets and editor content are never reinterpreted.
        FieldType::Password | FieldType::CodeEditor | FieldType::Hidden => {
            Ok(Value::String(raw.to_string()))
        }
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(integer) = raw.parse::<i64>() {
        return Some(Value::Number(Number::from(integer)));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Match raw input against a resolved option list.
///
/// Matching tries the exact option value first, then falls back to a
/// case-insensitive match on the display name. `None` means no option
/// matched; the engine treats that as a validation failure for required
/// fields and as "absent" otherwise.
pub fn match_select(raw: &str, options: &[SelectOption]) -> Option<Value> {
    if let Some(option) = options
        .iter()
        .find(|option| value_to_string(&option.value) == raw)
    {
        return Some(option.submit_value());
    }

    options
        .iter()
        .find(|option| option.name.eq_ignore_ascii_case(raw))
        .map(SelectOption::submit_value)
}

/// Interpret code-editor content as structured data: JSON first, YAML as the
/// fallback.
pub fn parse_structured(content: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(value);
    }
    serde_yaml::from_str::<Value>(content)
        .map_err(|e| anyhow!(e))
        .context("content is neither valid JSON nor valid YAML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkbox_truthy_set_is_exact() {
        for raw in ["on", "true", "1", ""] {
            assert_eq!(
                coerce(raw, FieldType::Checkbox),
                Ok(Value::Bool(true)),
                "'{raw}' should be true"
            );
        }
        for raw in ["off", "false", "0", "no", "yes", "TRUE", "On", "anything"] {
            assert_eq!(
                coerce(raw, FieldType::Checkbox),
                Ok(Value::Bool(false)),
                "'{raw}' should be false"
            );
        }
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce("42", FieldType::Number), Ok(json!(42)));
        assert_eq!(coerce("-7", FieldType::Number), Ok(json!(-7)));
        assert_eq!(coerce("2.5", FieldType::Number), Ok(json!(2.5)));
        assert!(coerce("forty-two", FieldType::Number).is_err());
        assert!(coerce("", FieldType::Number).is_err());
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(coerce("hello", FieldType::Text), Ok(json!("hello")));
        assert_eq!(coerce("", FieldType::Textarea), Ok(json!("")));
    }

    #[test]
    fn test_literal_null_clears_clearable_types() {
        assert_eq!(coerce("null", FieldType::Text), Ok(Value::Null));
        assert_eq!(coerce("null", FieldType::Textarea), Ok(Value::Null));
        assert_eq!(coerce("null", FieldType::Number), Ok(Value::Null));
        assert_eq!(coerce("null", FieldType::Select), Ok(Value::Null));
    }

    #[test]
    fn test_literal_null_is_content_for_secrets_and_editors() {
        assert_eq!(coerce("null", FieldType::Password), Ok(json!("null")));
        assert_eq!(coerce("null", FieldType::CodeEditor), Ok(json!("null")));
    }

    #[test]
    fn test_match_select_by_value_then_name() {
        let options = vec![
            SelectOption::new("Amazon Web Services", "amazon"),
            SelectOption::new("Azure", "azure"),
            SelectOption::new("Port", 8080),
        ];

        assert_eq!(match_select("amazon", &options), Some(json!("amazon")));
        assert_eq!(match_select("AZURE", &options), Some(json!("azure")));
        assert_eq!(
            match_select("amazon web services", &options),
            Some(json!("amazon"))
        );
        assert_eq!(match_select("8080", &options), Some(json!(8080)));
        assert_eq!(match_select("google", &options), None);
    }

    #[test]
    fn test_match_select_prefers_value_over_name() {
        // "b" is both the value of the first option and the name of the
        // second; the value match wins.
        let options = vec![SelectOption::new("A", "b"), SelectOption::new("b", "c")];

        assert_eq!(match_select("b", &options), Some(json!("b")));
    }

    #[test]
    fn test_parse_structured_json_then_yaml() {
        assert_eq!(
            parse_structured(r#"{"key": "value"}"#).unwrap(),
            json!({"key": "value"})
        );
        assert_eq!(
            parse_structured("key: value\nport: 8080").unwrap(),
            json!({"key": "value", "port": 8080})
        );
        assert!(parse_structured("{not: valid: json: or: yaml}").is_err());
    }
}
