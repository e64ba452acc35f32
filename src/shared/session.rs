//! Derived session state.
//!
//! "Signed in" is never stored. It is recomputed from whatever access token is
//! at hand and the current time, every time someone asks.

use chrono::{DateTime, Utc};

use crate::shared::claims::{decode_unverified, TokenClaims};

/// Condition of the access token at a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token (or an empty one)
    Absent,
    /// Token decodes and `now <= exp`
    Valid(TokenClaims),
    /// Token decodes but `now > exp`
    Expired(TokenClaims),
    /// Token does not decode
    Malformed,
}

impl SessionState {
    /// Classify `token` at `now`
    pub fn evaluate(token: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Self::Absent;
        };

        match decode_unverified(token) {
            Ok(claims) if claims.is_expired_at(now) => Self::Expired(claims),
            Ok(claims) => Self::Valid(claims),
            Err(e) => {
                tracing::debug!("[Session] Access token could not be decoded: {}", e);
                Self::Malformed
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Claims of a decodable token, expired or not
    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            Self::Valid(claims) | Self::Expired(claims) => Some(claims),
            Self::Absent | Self::Malformed => None,
        }
    }
}
