//! Types shared by the request pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP methods used by the NiceHash API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper case method name, as signed and sent
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Request Body
// ============================================================================

/// Request body
///
/// JSON bodies are sent (and signed) as compact JSON text with keys in
/// insertion order. Raw bodies are sent verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Raw(String),
}

impl Body {
    /// Serialize the body, or `None` when there is nothing to send
    ///
    /// `null` and the empty string count as no body.
    pub fn encode(&self) -> Option<String> {
        match self {
            Self::Json(Value::Null) => None,
            Self::Json(value) => Some(value.to_string()),
            Self::Raw(raw) if raw.is_empty() => None,
            Self::Raw(raw) => Some(raw.clone()),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Body {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for Body {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

// ============================================================================
// Server Time
// ============================================================================

/// Response of `GET /api/v2/time`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Server clock, epoch milliseconds
    pub server_time: i64,
}
