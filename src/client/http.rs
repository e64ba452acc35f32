/**
 * HTTP Client Wrapper
 *
 * Every API call goes through `ApiClient::send`. The wrapper attaches the access
 * token as a bearer credential and recovers from an expired access token on its
 * own, so callers only ever see the final outcome.
 *
 * # Refresh and Retry
 *
 * A 401 on the original attempt triggers one token refresh:
 *
 * 1. No refresh token stored: credentials are cleared, the user is sent to the
 *    login page and the original 401 is returned.
 * 2. Refresh succeeds: the new access token is stored and the request is sent
 *    once more as `Attempt::RetryAfterRefresh`. That outcome is returned as is.
 * 3. Refresh fails: credentials are cleared, the user is sent to the login page
 *    and `ApiError::RefreshFailed` is returned.
 *
 * A 401 on the retry is returned without another refresh.
 *
 * # Single Flight
 *
 * Refreshes are serialized behind `refresh_gate`. A request that waited on the
 * gate first checks whether the access token changed while it waited; if so it
 * retries with the new token instead of refreshing again.
 */

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::config::Config;
use crate::client::credentials::{CredentialStore, TokenKind};
use crate::client::error::ApiError;
use crate::client::navigation::Navigator;
use crate::client::transfer::UploadFile;
use crate::shared::models::{RefreshRequest, RefreshResponse};

/// Token refresh endpoint
pub const REFRESH_PATH: &str = "/users/token/refresh/";

/// Which dispatch of a request this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First dispatch
    Original,
    /// Dispatch after a successful refresh; never refreshes again
    RetryAfterRefresh,
}

impl Attempt {
    pub fn may_refresh(self) -> bool {
        matches!(self, Attempt::Original)
    }
}

/// Request body, kept in owned form so it can be sent twice
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart {
        field: &'static str,
        file: UploadFile,
    },
}

/// API request description
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL
    pub path: String,
    pub body: RequestBody,
    /// Attach the bearer token and recover from 401
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a single-file multipart body
    pub fn multipart(mut self, field: &'static str, file: UploadFile) -> Self {
        self.body = RequestBody::Multipart { field, file };
        self
    }

    /// Send without credentials (login, register)
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// Authenticated API client
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    credentials: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.api_base_url())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: Config,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, credentials, navigator)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        config: Config,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
            navigator,
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Send a request, refreshing the access token once on 401
    ///
    /// Returns the successful response, or the error of the final attempt.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let mut attempt = Attempt::Original;
        loop {
            let token = if request.authenticated {
                self.credentials.get(TokenKind::Access)
            } else {
                None
            };

            let response = self.dispatch(&request, token.as_deref(), attempt).await?;
            if response.status() != StatusCode::UNAUTHORIZED
                || !request.authenticated
                || !attempt.may_refresh()
            {
                return ensure_success(response).await;
            }

            let original = ApiError::from_response(response).await;
            self.recover_session(token.as_deref(), original).await?;
            attempt = Attempt::RetryAfterRefresh;
        }
    }

    /// Send a request and decode its JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        decode_json(response).await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<Response, ApiError> {
        let url = self.config.api_url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart { field, file } => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(file.mime())
                    .map_err(|_| ApiError::InvalidContentType {
                        content_type: file.mime().to_string(),
                    })?;
                builder.multipart(Form::new().part(*field, part))
            }
        };

        tracing::debug!(
            "[ApiClient] {} {} ({:?}, bearer: {})",
            request.method,
            request.path,
            attempt,
            token.is_some()
        );
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("[ApiClient] {} {} failed: {}", request.method, request.path, e);
            ApiError::Transport(e)
        })?;
        tracing::debug!(
            "[ApiClient] {} {} -> {}",
            request.method,
            request.path,
            response.status()
        );
        Ok(response)
    }

    /// Make a fresh access token available after a 401
    ///
    /// `stale` is the token the failed request carried. Returns `Ok` when the
    /// request should be retried.
    async fn recover_session(&self, stale: Option<&str>, original: ApiError) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.credentials.get(TokenKind::Access) {
            if Some(current.as_str()) != stale {
                tracing::debug!("[ApiClient] Access token renewed while waiting, retrying");
                return Ok(());
            }
        }

        let Some(refresh) = self.credentials.get(TokenKind::Refresh) else {
            tracing::info!("[ApiClient] 401 without a refresh token, signing out");
            self.end_session();
            return Err(original);
        };

        match self.refresh(&refresh).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("[ApiClient] Token refresh failed: {}", e);
                self.end_session();
                Err(ApiError::RefreshFailed(Box::new(e)))
            }
        }
    }

    /// Exchange the refresh token for a new access token
    ///
    /// The refresh token travels in the body only; no bearer header is sent.
    async fn refresh(&self, refresh: &str) -> Result<(), ApiError> {
        tracing::info!("[ApiClient] Refreshing access token");
        let response = self
            .http
            .post(self.config.api_url(REFRESH_PATH))
            .json(&RefreshRequest { refresh })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: RefreshResponse = decode_json(response).await?;

        let access = body
            .access
            .filter(|a| !a.is_empty())
            .ok_or(ApiError::MissingField("access"))?;
        self.credentials.set(TokenKind::Access, &access);
        if let Some(rotated) = body.refresh.filter(|r| !r.is_empty()) {
            self.credentials.set(TokenKind::Refresh, &rotated);
        }

        tracing::info!("[ApiClient] Access token refreshed");
        Ok(())
    }

    fn end_session(&self) {
        self.credentials.clear();
        self.navigator.navigate(self.config.login_path());
    }
}

/// Turn a non-success response into an error
pub async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response).await)
    }
}

/// Decode a JSON response body
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
