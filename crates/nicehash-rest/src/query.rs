//! Query string handling
//!
//! Structured queries are encoded the way the NiceHash web clients encode
//! them: `key=value` pairs joined by `&`, nested arrays and objects
//! flattened with bracket keys (`a[0]=x`, `a[b]=y`), and keys and values
//! percent-encoded per RFC 3986 (`%20` for space, brackets escaped).
//! The same string is signed and appended to the URL.

use crate::error::{RestError, RestResult};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A request query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Key/value mapping, encoded on demand
    Structured(Map<String, Value>),
    /// Pre-encoded query string (without the leading `?`), used verbatim
    Raw(String),
}

impl QueryValue {
    /// Encoded query string, without the leading `?`
    pub fn encode(&self) -> String {
        match self {
            Self::Structured(map) => stringify(map),
            Self::Raw(raw) => raw.clone(),
        }
    }

    /// Convert into a mapping, parsing raw strings
    pub fn into_map(self) -> RestResult<Map<String, Value>> {
        match self {
            Self::Structured(map) => Ok(map),
            Self::Raw(raw) => parse(&raw),
        }
    }
}

impl From<Map<String, Value>> for QueryValue {
    fn from(map: Map<String, Value>) -> Self {
        Self::Structured(map)
    }
}

impl From<String> for QueryValue {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for QueryValue {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

/// Encode a mapping as a query string
pub fn stringify(map: &Map<String, Value>) -> String {
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs.join("&")
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => pairs.push(format!("{}=", urlencoding::encode(&key))),
        Value::Bool(b) => push_pair(&key, &b.to_string(), pairs),
        Value::Number(n) => push_pair(&key, &n.to_string(), pairs),
        Value::String(s) => push_pair(&key, s, pairs),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten(format!("{}[{}]", key, idx), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(format!("{}[{}]", key, field), item, pairs);
            }
        }
    }
}

fn push_pair(key: &str, value: &str, pairs: &mut Vec<String>) {
    pairs.push(format!(
        "{}={}",
        urlencoding::encode(key),
        urlencoding::encode(value)
    ));
}

/// Parse a query string into a mapping
///
/// Values are kept as strings. A key that appears more than once collects
/// its values into an array.
pub fn parse(raw: &str) -> RestResult<Map<String, Value>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
        .map_err(|e| RestError::InvalidParameter(format!("invalid query string: {}", e)))?;

    let mut map = Map::new();
    for (key, value) in pairs {
        match map.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                map.insert(key, Value::String(value));
            }
        }
    }
    Ok(map)
}

/// Split `path?query` into its parts
///
/// An empty query (`/path?`) counts as none.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((path_only, query)) => (path_only, Some(query).filter(|q| !q.is_empty())),
        None => (path, None),
    }
}

/// Merge a path-embedded query with an explicit one
///
/// Explicit values win on key collision. Path keys keep their position.
/// Keys compare by their base name, so an explicit `a` also replaces
/// bracketed path keys such as `a[b]`.
pub fn merge(
    path_query: Option<&str>,
    explicit: Option<QueryValue>,
) -> RestResult<Option<QueryValue>> {
    let Some(path_query) = path_query else {
        return Ok(explicit);
    };

    let mut merged = parse(path_query)?;
    if let Some(explicit) = explicit {
        let explicit = explicit.into_map()?;
        let bases: HashSet<&str> = explicit.keys().map(|key| base_key(key)).collect();
        merged.retain(|key, _| explicit.contains_key(key) || !bases.contains(base_key(key)));
        for (key, value) in explicit {
            merged.insert(key, value);
        }
    }
    Ok(Some(QueryValue::Structured(merged)))
}

/// Key name before any bracketed path, `a` for `a[b][0]`
fn base_key(key: &str) -> &str {
    key.split_once('[').map_or(key, |(base, _)| base)
}

/// Builder for endpoint queries
///
/// Parameters are kept in insertion order; absent optional values are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Map<String, Value>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Add a parameter if it has a value
    pub fn opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Finish the query, `None` if no parameter was set
    pub fn build(self) -> Option<QueryValue> {
        (!self.params.is_empty()).then_some(QueryValue::Structured(self.params))
    }
}
