//! Property-based tests for the session guard decision table

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use filedesk::shared::guard::{self, GuardDecision, RouteClass, RouteTable};
use proptest::prelude::*;

fn token_expiring_in(seconds: i64) -> String {
    let exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
    format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp)))
}

fn protected_path() -> impl Strategy<Value = String> {
    (prop::sample::select(vec!["/dashboard", "/files", "/profile"]), "[a-z0-9/]{0,12}")
        .prop_map(|(prefix, rest)| format!("{}{}", prefix, rest))
}

fn auth_only_path() -> impl Strategy<Value = String> {
    (prop::sample::select(vec!["/login", "/register"]), "[a-z0-9/]{0,12}")
        .prop_map(|(prefix, rest)| format!("{}{}", prefix, rest))
}

proptest! {
    #[test]
    fn test_expired_token_on_protected_path_goes_to_login(
        path in protected_path(),
        age in 1i64..1_000_000,
    ) {
        let routes = RouteTable::default();
        let token = token_expiring_in(-age);
        prop_assert_eq!(
            guard::evaluate(&routes, &path, Some(&token), Utc::now()),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_valid_token_on_protected_path_is_allowed(
        path in protected_path(),
        ttl in 60i64..1_000_000,
    ) {
        let routes = RouteTable::default();
        let token = token_expiring_in(ttl);
        prop_assert_eq!(
            guard::evaluate(&routes, &path, Some(&token), Utc::now()),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_valid_token_on_auth_only_path_goes_to_landing(
        path in auth_only_path(),
        ttl in 60i64..1_000_000,
    ) {
        let routes = RouteTable::default();
        let token = token_expiring_in(ttl);
        prop_assert_eq!(
            guard::evaluate(&routes, &path, Some(&token), Utc::now()),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_malformed_token_is_treated_as_absent(
        path in protected_path(),
        garbage in "[^.]{0,40}",
    ) {
        let routes = RouteTable::default();
        prop_assert_eq!(
            guard::evaluate(&routes, &path, Some(&garbage), Utc::now()),
            guard::evaluate(&routes, &path, None, Utc::now())
        );
    }

    #[test]
    fn test_public_paths_ignore_the_session(path in "/[a-z0-9/._-]{0,24}", ttl in -1000i64..1000) {
        let routes = RouteTable::default();
        prop_assume!(routes.classify(&path) == RouteClass::Public);

        let token = token_expiring_in(ttl);
        prop_assert_eq!(guard::evaluate(&routes, &path, None, Utc::now()), GuardDecision::Allow);
        prop_assert_eq!(
            guard::evaluate(&routes, &path, Some(&token), Utc::now()),
            GuardDecision::Allow
        );
    }
}
