//! Credential persistence across backends and restarts

use filedesk::client::TokenKind;
use filedesk::shared::models::TokenPair;
use time::OffsetDateTime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_pair_lands_in_cookies_and_durable_storage() {
    let app = TestApp::start().await;
    let pair = TokenPair {
        access: access_token(300),
        refresh: refresh_token(),
    };

    app.ctx.credentials.set_pair(&pair);

    for kind in TokenKind::ALL {
        let cookie = app
            .ctx
            .credentials
            .cookies()
            .get(kind.key())
            .expect("cookie missing");
        assert_eq!(cookie.path(), Some("/"));
        let expires = cookie.expires_datetime().expect("cookie has no expiry");
        let ttl = app.ctx.config.cookie_ttl();
        assert!(expires > OffsetDateTime::now_utc() + ttl - time::Duration::minutes(1));
        assert!(expires <= OffsetDateTime::now_utc() + ttl);
    }
    assert_eq!(app.durable_value("access_token"), Some(pair.access.clone()));
    assert_eq!(app.durable_value("refresh_token"), Some(pair.refresh.clone()));

    let cookies = app.ctx.credentials.cookie_header().expect("no cookie header");
    assert_eq!(
        cookies,
        format!("access_token={}; refresh_token={}", pair.access, pair.refresh)
    );
}

#[tokio::test]
async fn test_restart_falls_back_to_durable_storage() {
    let app = TestApp::start().await;
    let access = access_token(300);
    app.sign_in(&access, &refresh_token());

    // a new context starts with an empty cookie jar
    let (ctx, _navigator) = app.reopen();
    assert!(ctx.credentials.cookie_header().is_none());
    assert_eq!(ctx.credentials.get(TokenKind::Access), Some(access.clone()));
    assert!(ctx.auth.check_auth());

    Mock::given(method("GET"))
        .and(path("/api/files/list/"))
        .and(header("authorization", bearer(&access).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    ctx.files.load_files().await;
    crate::assert_settled!(ctx.files.snapshot());
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let app = TestApp::start().await;
    app.sign_in(&access_token(300), &refresh_token());

    app.ctx.credentials.clear();

    for kind in TokenKind::ALL {
        assert_eq!(app.ctx.credentials.get(kind), None);
        assert_eq!(app.durable_value(kind.key()), None);
    }
    assert!(app.ctx.credentials.cookie_header().is_none());

    let (ctx, _navigator) = app.reopen();
    assert_eq!(ctx.credentials.get(TokenKind::Refresh), None);
    assert!(!ctx.auth.check_auth());
}

#[tokio::test]
async fn test_overwrite_replaces_previous_value() {
    let app = TestApp::start().await;
    let first = access_token(300);
    let second = access_token(600);

    app.ctx.credentials.set(TokenKind::Access, &first);
    app.ctx.credentials.set(TokenKind::Access, &second);

    assert_eq!(app.ctx.credentials.get(TokenKind::Access), Some(second.clone()));
    assert_eq!(app.durable_value("access_token"), Some(second));
    assert_eq!(app.ctx.credentials.get(TokenKind::Refresh), None);
}
