use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application-level error body returned by the API (`{"error": "..."}`).
///
/// The server uses this shape both with non-success statuses and, on some
/// routes, inside otherwise successful responses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The message meant for the end user.
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Extracts the `error` field from an arbitrary JSON body.
    ///
    /// Returns `None` when the body is not an object, has no `error` key, or
    /// the key is `null`/empty. Non-string values are rendered as JSON text.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let field = body.as_object()?.get("error")?;
        let text = match field {
            Value::Null => return None,
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::new(text))
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for ErrorResponse {}
