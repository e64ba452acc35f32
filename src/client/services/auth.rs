//! Authentication API Client

use std::sync::Arc;

use chrono::Utc;

use crate::client::credentials::TokenKind;
use crate::client::error::ApiError;
use crate::client::http::{ApiClient, ApiRequest};
use crate::shared::models::{LoginRequest, RegisterRequest, TokenPair};
use crate::shared::{SessionState, TokenClaims};

/// Authentication API client
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair and store it
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let request = ApiRequest::post("/users/login/")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?
            .anonymous();
        let pair: TokenPair = self.client.send_json(request).await?;

        self.client.credentials().set_pair(&pair);
        tracing::info!("[Auth] Signed in as {}", email);
        Ok(pair)
    }

    /// Create an account; the user signs in separately afterwards
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/users/register/").json(request)?.anonymous();
        self.client.send(request).await?;
        Ok(())
    }

    /// Forget both tokens
    pub fn logout(&self) {
        self.client.credentials().clear();
        tracing::info!("[Auth] Signed out");
    }

    /// Session state of the stored access token right now
    pub fn session(&self) -> SessionState {
        let token = self.client.credentials().get(TokenKind::Access);
        SessionState::evaluate(token.as_deref(), Utc::now())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Claims of the stored access token, expired or not
    pub fn current_claims(&self) -> Option<TokenClaims> {
        self.session().claims().cloned()
    }
}
