//! Query-string parameters for list and workflow endpoints.
//!
//! # Design
//! Parameters are kept as ordered `(name, value)` pairs and passed through
//! without validation. `from_serialize` accepts any serde object so callers
//! can hand over a typed struct or an ad-hoc `json!` map; scalar values are
//! rendered the way a browser HTTP client would put them on the wire, `null`
//! entries are dropped and arrays become repeated keys.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Ordered query parameters attached to an `HttpRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.pairs.push((name.into(), value.to_string()));
    }

    /// Flatten a serializable map into query pairs.
    ///
    /// `None`/unit serializes to an empty set. Anything that is not a map, or
    /// a map holding nested objects, is rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Serialization(format!(
                    "query parameters must be a map, got {}",
                    kind(&other)
                )))
            }
        };

        let mut params = Self::new();
        for (name, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(rendered) = render_scalar(&name, item)? {
                            params.insert(name.clone(), rendered);
                        }
                    }
                }
                other => {
                    if let Some(rendered) = render_scalar(&name, other)? {
                        params.insert(name, rendered);
                    }
                }
            }
        }
        Ok(params)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// First value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `a=1&b=2` form, without the leading `?`.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn render_scalar(name: &str, value: Value) -> Result<Option<String>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(ApiError::Serialization(format!(
            "query parameter `{name}` cannot hold {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
