//! Token refresh and retry through the HTTP client wrapper

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use filedesk::client::{ApiError, ApiRequest, TokenKind};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

const REFRESH: &str = "/api/users/token/refresh/";

#[tokio::test]
async fn test_expired_access_token_is_refreshed_transparently() {
    let app = TestApp::start().await;
    let stale = expired_access_token();
    let fresh = access_token(300);
    let refresh = refresh_token();
    app.sign_in(&stale, &refresh);

    Mock::given(method("GET"))
        .and(path("/api/users/profile/"))
        .and(header("authorization", bearer(&stale).as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(NoAuthorization)
        .and(body_json(json!({"refresh": refresh})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": fresh})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile/"))
        .and(header("authorization", bearer(&fresh).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(vec![])))
        .expect(1)
        .mount(&app.server)
        .await;

    assert!(!app.ctx.auth.check_auth());
    app.ctx.user.fetch_profile().await;

    let state = app.ctx.user.snapshot();
    crate::assert_settled!(state);
    assert_eq!(state.profile.map(|p| p.email).as_deref(), Some("ada@example.com"));

    // the new access token landed in both locations
    assert_eq!(app.ctx.credentials.get(TokenKind::Access), Some(fresh.clone()));
    assert_eq!(app.durable_value("access_token"), Some(fresh.clone()));
    assert!(app.ctx.auth.check_auth());
    assert!(app.navigator.history().is_empty());
}

#[tokio::test]
async fn test_second_401_does_not_refresh_again() {
    let app = TestApp::start().await;
    let fresh = access_token(300);
    app.sign_in(&expired_access_token(), &refresh_token());

    Mock::given(method("GET"))
        .and(path("/api/files/list/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "User not found",
            "code": "user_not_found"
        })))
        .expect(2)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": fresh})))
        .expect(1)
        .mount(&app.server)
        .await;

    let result = app.ctx.client.send(ApiRequest::get("/files/list/")).await;
    assert_matches!(result, Err(ApiError::Unauthorized { .. }));

    // the retry's 401 is the caller's problem, not a reason to sign out
    assert_eq!(app.ctx.credentials.get(TokenKind::Access), Some(fresh));
    assert!(app.navigator.history().is_empty());
}

#[tokio::test]
async fn test_invalid_refresh_token_signs_out() {
    let app = TestApp::start().await;
    app.sign_in(&expired_access_token(), &refresh_token());

    Mock::given(method("GET"))
        .and(path("/api/files/list/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.ctx.files.load_files().await;

    crate::assert_store_error!(app.ctx.files.snapshot(), "Failed to load files");
    for kind in TokenKind::ALL {
        assert_eq!(app.ctx.credentials.get(kind), None);
        assert_eq!(app.durable_value(kind.key()), None);
    }
    assert!(app.ctx.credentials.cookie_header().is_none());
    assert_eq!(app.navigator.current().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_refresh_error_is_returned() {
    let app = TestApp::start().await;
    app.sign_in(&expired_access_token(), &refresh_token());

    Mock::given(method("GET"))
        .and(path("/api/files/dashboard/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let result = app.ctx.client.send(ApiRequest::get("/files/dashboard/")).await;
    assert_matches!(result, Err(ApiError::RefreshFailed(inner)) => {
        assert_matches!(*inner, ApiError::Server { .. });
    });
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let app = TestApp::start().await;
    let stale = expired_access_token();
    let fresh = access_token(300);
    app.sign_in(&stale, &refresh_token());

    Mock::given(method("GET"))
        .and(header("authorization", bearer(&stale).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": fresh}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", bearer(&fresh).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&app.server)
        .await;

    let client = Arc::clone(&app.ctx.client);
    let handles: Vec<_> = ["/files/list/", "/users/addresses/", "/files/list/"]
        .into_iter()
        .map(|p| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.send(ApiRequest::get(p)).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.expect("request task panicked");
        crate::assert_ok!(response);
    }
    assert_eq!(app.ctx.credentials.get(TokenKind::Access), Some(fresh));
}

#[tokio::test]
async fn test_multipart_body_is_resent_after_refresh() {
    let app = TestApp::start().await;
    let stale = expired_access_token();
    let fresh = access_token(300);
    app.sign_in(&stale, &refresh_token());

    Mock::given(method("POST"))
        .and(path("/api/files/upload/"))
        .and(header("authorization", bearer(&stale).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": fresh})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/files/upload/"))
        .and(header("authorization", bearer(&fresh).as_str()))
        .and(wiremock::matchers::body_string_contains("retry me"))
        .respond_with(ResponseTemplate::new(201).set_body_json(file_json(5, "notes.txt")))
        .expect(1)
        .mount(&app.server)
        .await;

    let request = ApiRequest::post("/files/upload/").multipart(
        "file",
        filedesk::client::UploadFile::new("notes.txt", b"retry me".to_vec()),
    );
    let response = crate::assert_ok!(app.ctx.client.send(request).await);
    assert_eq!(response.status().as_u16(), 201);
}
