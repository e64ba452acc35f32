/**
 * Session Guard
 *
 * Decides, before a page renders, whether the visitor may see it. The decision
 * looks only at the access token carried by the navigation and the wall clock:
 * no network call, no token renewal.
 *
 * # Decision Table
 *
 * | token    | protected | auth-only | public |
 * |----------|-----------|-----------|--------|
 * | absent   | login     | allow     | allow  |
 * | valid    | allow     | landing   | allow  |
 * | expired  | login     | allow     | allow  |
 * | malformed| login     | allow     | allow  |
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::session::SessionState;

/// Route prefixes and redirect targets the guard works from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Prefixes that require a valid session
    pub protected: Vec<String>,
    /// Prefixes only meaningful while signed out (login, register)
    pub auth_only: Vec<String>,
    /// Prefixes the edge middleware never inspects (assets, API proxy)
    pub bypass: Vec<String>,
    /// Where unauthenticated visitors are sent
    pub login_path: String,
    /// Where signed-in visitors are sent away from auth-only pages
    pub landing_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            protected: owned(&["/dashboard", "/files", "/profile"]),
            auth_only: owned(&["/login", "/register"]),
            bypass: owned(&[
                "/_next/static",
                "/_next/image",
                "/favicon.ico",
                "/images",
                "/api",
            ]),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

/// Class of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthOnly,
    Public,
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested page
    Allow,
    /// Send the visitor to this path instead
    Redirect(String),
}

impl RouteTable {
    /// Classify a request path by plain prefix match, protected first
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.iter().any(|p| path.starts_with(p.as_str())) {
            RouteClass::Protected
        } else if self.auth_only.iter().any(|p| path.starts_with(p.as_str())) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Public
        }
    }

    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Decide whether a navigation to `path` may proceed
///
/// # Arguments
///
/// * `routes` - Route table to classify `path` against
/// * `path` - Request path of the navigation
/// * `token` - Access token carried with the navigation, if any
/// * `now` - Current wall-clock time
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use filedesk::shared::{guard, GuardDecision, RouteTable};
///
/// let routes = RouteTable::default();
/// assert_eq!(
///     guard::evaluate(&routes, "/files", None, Utc::now()),
///     GuardDecision::Redirect("/login".to_string())
/// );
/// assert_eq!(guard::evaluate(&routes, "/", None, Utc::now()), GuardDecision::Allow);
/// ```
pub fn evaluate(
    routes: &RouteTable,
    path: &str,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> GuardDecision {
    let class = routes.classify(path);
    if class == RouteClass::Public {
        return GuardDecision::Allow;
    }

    match (SessionState::evaluate(token, now), class) {
        (SessionState::Valid(_), RouteClass::AuthOnly) => {
            GuardDecision::Redirect(routes.landing_path.clone())
        }
        (SessionState::Valid(_), _) => GuardDecision::Allow,
        (_, RouteClass::Protected) => GuardDecision::Redirect(routes.login_path.clone()),
        _ => GuardDecision::Allow,
    }
}
