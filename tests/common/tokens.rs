//! Token helpers
//!
//! Mints JWTs shaped like the ones the API issues. The client never verifies
//! signatures, so any secret will do.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

const TEST_SECRET: &[u8] = b"filedesk-test-secret";

static NEXT_JTI: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize)]
struct Claims {
    token_type: &'static str,
    exp: i64,
    iat: i64,
    jti: String,
    user_id: i64,
}

fn mint(token_type: &'static str, exp: i64) -> String {
    let claims = Claims {
        token_type,
        exp,
        iat: Utc::now().timestamp(),
        jti: format!("jti-{}", NEXT_JTI.fetch_add(1, Ordering::Relaxed)),
        user_id: 1,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET))
        .expect("Failed to mint test token")
}

/// Access token valid for `ttl_secs` more seconds
pub fn access_token(ttl_secs: i64) -> String {
    mint("access", Utc::now().timestamp() + ttl_secs)
}

/// Access token that expired a minute ago
pub fn expired_access_token() -> String {
    mint("access", Utc::now().timestamp() - 60)
}

/// Refresh token valid for a day
pub fn refresh_token() -> String {
    mint("refresh", Utc::now().timestamp() + 86_400)
}
