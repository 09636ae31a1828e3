//! Helpers for turning loosely-typed JSON payloads into typed documents.
//!
//! Documents are non-strict: unknown top-level keys are kept in an `extra`
//! map. System-managed keys are never taken from a client payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys owned by the store. Clients may echo them back (for example when
/// editing a document they just fetched) but they are always discarded.
const SYSTEM_KEYS: &[&str] = &["id", "_id", "createdAt", "updatedAt", "__v"];

/// One or more problems with a payload's shape or values.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", problems.join(", "))]
pub struct ValidationError {
    problems: Vec<String>,
}

impl ValidationError {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

/// Accumulates field problems so a caller sees all of them at once.
#[derive(Debug, Default)]
pub(crate) struct Problems(Vec<String>);

impl Problems {
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(format!("{field}: {message}"));
    }

    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems: self.0 })
        }
    }
}

/// Returns the payload as a JSON object with system keys removed.
pub fn client_fields(payload: Value) -> Result<Map<String, Value>, ValidationError> {
    match payload {
        Value::Object(mut map) => {
            for key in SYSTEM_KEYS {
                map.remove(*key);
            }
            Ok(map)
        }
        other => Err(ValidationError::new(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Overlays the top-level keys of `patch` onto `base`.
///
/// Nested objects are replaced wholesale, not merged.
pub fn merge_fields(mut base: Map<String, Value>, patch: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        base.insert(key, value);
    }
    base
}

/// Serializes a draft back into its field map.
pub fn to_fields<T: Serialize>(draft: &T) -> Map<String, Value> {
    match serde_json::to_value(draft) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Deserializes a cleaned field map into a draft type.
pub fn parse_fields<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError::new(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
