/**
 * Client Error Types
 *
 * Everything that can go wrong between issuing an API request and having a decoded
 * result in hand.
 *
 * # Error Categories
 *
 * ## Transport
 *
 * The request never produced an HTTP response (DNS, connect, TLS, timeout).
 *
 * ## Status
 *
 * The API answered with a non-success status. The body is kept as an `ErrorBody`
 * so stores can pull a display message out of it:
 * - `Unauthorized` for 401
 * - `Client` for the remaining 4xx
 * - `Server` for 5xx
 *
 * ## Refresh
 *
 * A 401 triggered a token refresh and the refresh itself failed. Credentials have
 * been cleared and the user has been sent to the login page by the time this is
 * returned.
 */

use reqwest::StatusCode;
use thiserror::Error;

use crate::shared::ErrorBody;

/// API client error
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was received
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401 Unauthorized
    #[error("unauthorized")]
    Unauthorized {
        /// Response body
        body: ErrorBody,
    },

    /// 4xx other than 401
    #[error("request rejected with status {status}")]
    Client {
        /// Response status
        status: StatusCode,
        /// Response body
        body: ErrorBody,
    },

    /// 5xx
    #[error("server error with status {status}")]
    Server {
        /// Response status
        status: StatusCode,
        /// Response body
        body: ErrorBody,
    },

    /// Success response whose body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token refresh failed after a 401
    #[error("session expired: {0}")]
    RefreshFailed(Box<ApiError>),

    /// Local file error while preparing an upload or saving a download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upload carries a content type that is not a valid mime string
    #[error("invalid content type {content_type:?}")]
    InvalidContentType {
        /// Offending value
        content_type: String,
    },

    /// Success response missing a required field
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// Build an error from a non-success response, consuming its body
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => ErrorBody::from_bytes(&bytes),
            Err(e) => {
                tracing::warn!("[ApiClient] Could not read error body: {}", e);
                ErrorBody::default()
            }
        };
        Self::from_status(status, body)
    }

    /// Classify a status code and body
    pub fn from_status(status: StatusCode, body: ErrorBody) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { body }
        } else if status.is_server_error() {
            Self::Server { status, body }
        } else {
            Self::Client { status, body }
        }
    }

    /// HTTP status, when the API answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Body of a 4xx answer
    ///
    /// 5xx bodies are not offered for display.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Unauthorized { body } | Self::Client { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Display message for the view layer
    ///
    /// Uses the body's field error, detail, non-field error or text, and falls back
    /// to `fallback` when the body offers none.
    pub fn user_message(&self, fallback: &str) -> String {
        self.body()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Display message preferring the raw message listed under `field`
    pub fn field_message(&self, field: &str, fallback: &str) -> String {
        match self.body().and_then(|b| b.field_error(field)) {
            Some(message) => message.to_string(),
            None => self.user_message(fallback),
        }
    }
}
