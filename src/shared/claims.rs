/**
 * Token Claims
 *
 * Access and refresh tokens are JWTs minted by the API. The client never holds the
 * signing key, so it only reads the payload segment to learn when a token expires.
 * Nothing here verifies a signature; the API remains the authority on validity.
 */

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried in an access or refresh token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Issued at time (Unix timestamp, seconds)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Server-side user id
    #[serde(default)]
    pub user_id: Option<i64>,
    /// `access` or `refresh`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token id
    #[serde(default)]
    pub jti: Option<String>,
}

impl TokenClaims {
    /// Expiry as a timestamp, if `exp` is representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// True once `now` is strictly past `exp`, sub-second part included
    ///
    /// An `exp` outside the representable range counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(true, |expires| now > expires)
    }
}

/// Reasons a token could not be decoded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// Not three dot-separated segments
    #[error("token is not a JWT")]
    Format,
    /// Payload segment is not base64url
    #[error("invalid payload encoding: {0}")]
    Encoding(String),
    /// Payload is not a JSON object with an `exp` claim
    #[error("invalid payload: {0}")]
    Payload(String),
}

/// Decode the claims of a JWT without verifying its signature
///
/// # Example
///
/// ```rust
/// use filedesk::shared::decode_unverified;
///
/// // {"alg":"HS256"}.{"exp":1700000000}.sig
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjE3MDAwMDAwMDB9.c2ln";
/// assert_eq!(decode_unverified(token).unwrap().exp, 1_700_000_000);
/// ```
pub fn decode_unverified(token: &str) -> Result<TokenClaims, ClaimsError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(_signature), None)
            if !header.is_empty() && !payload.is_empty() =>
        {
            payload
        }
        _ => return Err(ClaimsError::Format),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Payload(e.to_string()))
}
