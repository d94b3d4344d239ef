//! Control protocol wire types.
//!
//! One JSON request per connection, one JSON response back. `result` and
//! `error` are mutually exclusive and omitted when absent, so clients check
//! `ok` before reading either.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A control request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request {
    /// Action name, e.g. `start_pattern`.
    pub action: String,
    /// Action parameters; absent in the wire form means empty.
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
}

impl Request {
    /// Request with no parameters.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: serde_json::Map::new(),
        }
    }

    /// Add one parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A control response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response {
    /// Whether the action succeeded.
    pub ok: bool,
    /// Success payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Successful response carrying a payload.
    #[must_use]
    pub fn ok(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// Failed response carrying an error string.
    #[must_use]
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}
