//! Path operations over a parsed YAML document.
//!
//! The document is a [`serde_yaml::Value`] tree (scalar / sequence / mapping
//! variants); every operation pattern-matches on the variant at each step and
//! fails predictably when a non-mapping node is indexed by key. Mapping key
//! order is preserved across parse and serialize.

use crate::yaml::errors::YamlError;
use crate::yaml::path::FieldPath;
use serde_yaml::{Mapping, Value};

pub fn parse_document(text: &str) -> Result<Value, YamlError> {
    serde_yaml::from_str(text).map_err(|err| YamlError::InvalidSyntax {
        message: err.to_string(),
    })
}

pub fn serialize_document(doc: &Value) -> Result<String, YamlError> {
    serde_yaml::to_string(doc).map_err(|err| YamlError::Serialize {
        message: err.to_string(),
    })
}

/// Find every dot-path whose terminal key equals `name`.
///
/// Walks mapping entries in document key order. A matching key is recorded
/// and its value is not searched further; a non-matching entry whose value is
/// itself a mapping is descended into. Sequence elements are not descended
/// into, so fields nested inside list entries are not found. The same name at
/// several depths yields one path per occurrence.
pub fn find_by_name(doc: &Value, name: &str) -> Vec<FieldPath> {
    let mut found = Vec::new();
    let mut prefix = Vec::new();
    walk(doc, name, &mut prefix, &mut found);
    found
}

fn walk(node: &Value, name: &str, prefix: &mut Vec<String>, found: &mut Vec<FieldPath>) {
    let Some(mapping) = node.as_mapping() else {
        return;
    };
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        if key == name {
            let mut segments = prefix.clone();
            segments.push(key.to_string());
            if let Ok(path) = FieldPath::new(segments) {
                found.push(path);
            }
        } else if value.is_mapping() {
            prefix.push(key.to_string());
            walk(value, name, prefix, found);
            prefix.pop();
        }
    }
}

/// Whether `path` resolves to a present value.
///
/// Presence is tracked independently of the value itself: a key holding
/// `null`, `0`, `""`, or `false` exists. Only an absent segment, or descent
/// through a non-mapping node, reports `false`.
pub fn exists(doc: &Value, path: &FieldPath) -> bool {
    get(doc, path).is_some()
}

/// Resolve `path` to a value, without error reporting. `None` on the first
/// missing segment or non-mapping descent.
pub fn get<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.segments() {
        current = current.get(segment.as_str())?;
    }
    Some(current)
}

/// Assign `value` at `path`, mutating the document in place.
///
/// Absent or `null` intermediate segments are auto-vivified as empty
/// mappings. An intermediate holding any other non-mapping value is an error
/// naming the offending prefix, never a silent overwrite.
pub fn set(doc: &mut Value, path: &FieldPath, value: Value) -> Result<(), YamlError> {
    let segments = path.segments();
    let mut current = doc;
    for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
        if current.is_null() {
            *current = Value::Mapping(Mapping::new());
        }
        let mapping = current
            .as_mapping_mut()
            .ok_or_else(|| YamlError::NotAMapping {
                path: path.prefix(depth),
            })?;
        let next = mapping
            .entry(Value::String(segment.clone()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if next.is_null() {
            *next = Value::Mapping(Mapping::new());
        }
        current = next;
    }
    if current.is_null() {
        *current = Value::Mapping(Mapping::new());
    }
    let mapping = current
        .as_mapping_mut()
        .ok_or_else(|| YamlError::NotAMapping {
            path: path.prefix(segments.len() - 1),
        })?;
    let terminal = segments[segments.len() - 1].clone();
    mapping.insert(Value::String(terminal), value);
    Ok(())
}

/// Render a scalar node for string comparison. `None` for sequences,
/// mappings, and tagged values.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Interpret a raw patch value as a YAML scalar, so `8080` stays a number and
/// `true` a bool. Anything that parses as a structured value, or fails to
/// parse, is written as a plain string.
pub fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value) if !value.is_mapping() && !value.is_sequence() => value,
        _ => Value::String(raw.to_string()),
    }
}
