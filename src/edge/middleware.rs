/**
 * Session Guard Middleware
 *
 * Runs before a page is served. It reads the `access_token` cookie the browser
 * sent with the navigation and asks `shared::guard` whether the page may be
 * rendered. Nothing here talks to the API or renews tokens.
 *
 * Paths under a bypass prefix (assets, the API proxy) are passed through
 * untouched.
 */

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use cookie::Cookie;

use crate::client::credentials::TokenKind;
use crate::shared::guard::{self, GuardDecision, RouteTable};

/// Guard page navigations
///
/// Use with `axum::middleware::from_fn_with_state(Arc<RouteTable>, session_guard)`.
pub async fn session_guard(
    State(routes): State<Arc<RouteTable>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if routes.is_bypassed(&path) {
        return next.run(request).await;
    }

    let token = cookie_value(request.headers(), TokenKind::Access.key());
    match guard::evaluate(&routes, &path, token.as_deref(), Utc::now()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!("[SessionGuard] {} -> {}", path, target);
            Redirect::temporary(&target).into_response()
        }
    }
}

/// Value of the first cookie named `name` across all `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}
