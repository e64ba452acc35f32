//! API Error Bodies
//!
//! The API answers failed requests with Django REST framework style bodies. The
//! three shapes that matter for display are:
//!
//! - field validation errors: `{"email": ["user with this email already exists."]}`
//! - a detail message: `{"detail": "No active account found with the given credentials"}`
//! - non-field errors: `{"non_field_errors": ["Passwords do not match."]}`
//!
//! `ErrorBody` keeps the raw body and knows how to pull a single display string
//! out of it.
//!
//! # Usage
//!
//! ```rust
//! use filedesk::shared::ErrorBody;
//!
//! let body = ErrorBody::from_bytes(br#"{"email": ["Enter a valid email address."]}"#);
//! assert_eq!(body.message().as_deref(), Some("email: Enter a valid email address."));
//! ```

use serde_json::Value;

/// Raw body of a failed API response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorBody(Value);

impl ErrorBody {
    /// Wrap a response body
    ///
    /// JSON bodies are kept as parsed values; anything else is kept as text.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self(Value::Null);
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(String::from_utf8_lossy(bytes).trim().to_string())),
        }
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// First key of the body, rendered as `"field: message"` when it maps to a list
    pub fn first_field_error(&self) -> Option<String> {
        let (field, value) = self.0.as_object()?.iter().next()?;
        let message = value.as_array()?.first()?.as_str()?;
        Some(format!("{}: {}", field, message))
    }

    /// First message listed under `field`
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.0.get(field)?.as_array()?.first()?.as_str()
    }

    pub fn detail(&self) -> Option<&str> {
        self.0.get("detail")?.as_str()
    }

    pub fn non_field_error(&self) -> Option<&str> {
        self.field_error("non_field_errors")
    }

    /// Plain-text body
    pub fn text(&self) -> Option<&str> {
        self.0.as_str().filter(|s| !s.is_empty())
    }

    /// Best display message: field error, then detail, then non-field error, then text
    pub fn message(&self) -> Option<String> {
        self.first_field_error()
            .or_else(|| self.detail().map(str::to_string))
            .or_else(|| self.non_field_error().map(str::to_string))
            .or_else(|| self.text().map(str::to_string))
    }
}

impl From<Value> for ErrorBody {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
