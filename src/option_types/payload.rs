//! Payload assembly helpers.
//!
//! Request bodies are built up by deep-merging one resolved value group at a
//! time (base options, advanced options, manual `-O` overrides last). The
//! helpers in this module are pure functions over [`serde_json::Value`]; no
//! state survives a single command invocation.

use anyhow::{Result, bail};
use serde_json::{Map, Value};

/// Recursively merge `source` into `target`.
///
/// When both sides hold an object for the same key the objects are merged key
/// by key; in every other case (scalars, arrays, mismatched types) the source
/// value overwrites the target value. Merging the same source twice yields
/// the same result as merging it once.
pub fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match target_map.get_mut(key) {
                    Some(target_value) => deep_merge(target_value, source_value),
                    None => {
                        target_map.insert(key.clone(), source_value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

/// Return a copy of `value` with null, empty-string, and empty-object values
/// removed, recursively.
///
/// An object that only contained such values becomes empty itself and is
/// dropped by its parent in turn. Arrays are kept as-is apart from compacting
/// any object elements; an empty array is not considered an empty value.
pub fn deep_compact(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let compacted: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), deep_compact(value)))
                .filter(|(_, value)| !is_blank(value))
                .collect();
            Value::Object(compacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(deep_compact).collect()),
        other => other.clone(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Insert `value` into `root` at the given path segments, creating
/// intermediate objects as needed.
///
/// A non-object value sitting in the middle of the path is replaced by an
/// object; the final segment overwrites whatever was there before.
pub fn set_at<S: AsRef<str>>(root: &mut Map<String, Value>, segments: &[S], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.as_ref().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            unreachable!("entry was just made an object");
        };
        current = next;
    }

    current.insert(last.as_ref().to_string(), value);
}

/// Look up a value in `root` by path segments without cloning.
pub fn get_at<'a, S: AsRef<str>>(root: &'a Map<String, Value>, segments: &[S]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(first.as_ref())?;
    for segment in rest {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    Some(current)
}

/// Parse a manual override expression of the form `path.to.field=value`.
///
/// The value side is interpreted as JSON when it parses as JSON (so `null`,
/// `true`, `3`, `[1,2]` produce typed values) and falls back to a plain
/// string otherwise.
pub fn parse_set_expression(raw: &str) -> Result<(Vec<String>, Value)> {
    let Some((path, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got '{raw}'");
    };
    if path.is_empty() {
        bail!("expected KEY=VALUE, got '{raw}'");
    }

    let segments: Vec<String> = path.split('.').map(ToString::to_string).collect();
    if segments.iter().any(String::is_empty) {
        bail!("invalid field path '{path}'");
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((segments, value))
}

/// Apply a batch of `path.to.field=value` overrides to a payload, in order.
/// Later expressions win over earlier ones and over anything already present.
pub fn apply_set_expressions(root: &mut Map<String, Value>, expressions: &[String]) -> Result<()> {
    for expression in expressions {
        let (segments, value) = parse_set_expression(expression)?;
        set_at(root, &segments, value);
    }
    Ok(())
}

/// Render a scalar value the way it compares in dependency checks and select
/// matching: strings verbatim, numbers and booleans in their JSON form, null
/// as the empty string. Arrays and objects fall back to compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
