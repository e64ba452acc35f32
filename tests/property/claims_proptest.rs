//! Property-based tests for token decoding

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use filedesk::shared::{decode_unverified, SessionState};
use proptest::prelude::*;

fn token_with_exp(exp: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"token_type":"access"}}"#, exp));
    format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", payload)
}

proptest! {
    #[test]
    fn test_decode_never_panics(token in ".*") {
        let _ = decode_unverified(&token);
    }

    #[test]
    fn test_decode_never_panics_on_three_segments(
        header in "[A-Za-z0-9_-]{0,16}",
        payload in "[A-Za-z0-9_=+/-]{0,64}",
        signature in "[A-Za-z0-9_-]{0,16}",
    ) {
        let _ = decode_unverified(&format!("{}.{}.{}", header, payload, signature));
    }

    #[test]
    fn test_exp_survives_decoding(exp in 0i64..4_102_444_800) {
        let claims = decode_unverified(&token_with_exp(exp)).unwrap();
        prop_assert_eq!(claims.exp, exp);
        prop_assert_eq!(claims.token_type.as_deref(), Some("access"));
    }

    #[test]
    fn test_validity_boundary(exp in 1i64..4_102_444_800, offset in -3600i64..3600) {
        let token = token_with_exp(exp);
        let now = Utc.timestamp_opt(exp + offset, 0).unwrap();
        let session = SessionState::evaluate(Some(&token), now);

        // valid up to and including the expiry second
        prop_assert_eq!(session.is_authenticated(), offset <= 0);
        prop_assert!(session.claims().is_some());
    }
}
