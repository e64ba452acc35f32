//! Authentication store.
//!
//! `authenticated` is a cached answer for rendering only. Whenever it matters the
//! store recomputes it from the stored access token (`check_auth`).

use tokio::sync::watch;

use crate::client::error::ApiError;
use crate::client::services::AuthService;
use crate::client::stores::{Reducer, StateCell};
use crate::shared::models::RegisterRequest;
use crate::shared::TokenClaims;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Authentication state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub authenticated: bool,
    /// Claims of the access token the flag was computed from
    pub claims: Option<TokenClaims>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Authentication transitions
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Started,
    LoggedIn(Option<TokenClaims>),
    Registered,
    SessionChecked {
        authenticated: bool,
        claims: Option<TokenClaims>,
    },
    LoggedOut,
    Failed(String),
    ClearError,
}

impl Reducer for AuthState {
    type Action = AuthAction;

    fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::Started => Self {
                loading: true,
                error: None,
                ..self
            },
            AuthAction::LoggedIn(claims) => Self {
                authenticated: true,
                claims,
                loading: false,
                error: None,
            },
            AuthAction::Registered => Self {
                loading: false,
                error: None,
                ..self
            },
            AuthAction::SessionChecked {
                authenticated,
                claims,
            } => Self {
                authenticated,
                claims,
                ..self
            },
            AuthAction::LoggedOut => Self {
                authenticated: false,
                claims: None,
                ..self
            },
            AuthAction::Failed(message) => Self {
                loading: false,
                error: Some(message),
                ..self
            },
            AuthAction::ClearError => Self {
                error: None,
                ..self
            },
        }
    }
}

/// Authentication store
#[derive(Debug)]
pub struct AuthStore {
    service: AuthService,
    state: StateCell<AuthState>,
}

impl AuthStore {
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Sign in and store the issued token pair
    pub async fn login(&self, email: &str, password: &str) {
        self.state.apply(AuthAction::Started);
        match self.service.login(email, password).await {
            Ok(_) => {
                let claims = self.service.current_claims();
                self.state.apply(AuthAction::LoggedIn(claims));
            }
            Err(e) => {
                tracing::warn!("[AuthStore] Login failed: {}", e);
                self.state.apply(AuthAction::Failed(e.user_message(LOGIN_FAILED)));
            }
        }
    }

    /// Create an account
    ///
    /// The error is recorded in state and also returned, so a form can tell
    /// success from failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.state.apply(AuthAction::Started);
        match self.service.register(request).await {
            Ok(()) => {
                self.state.apply(AuthAction::Registered);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[AuthStore] Registration failed: {}", e);
                self.state
                    .apply(AuthAction::Failed(e.user_message(REGISTRATION_FAILED)));
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        self.service.logout();
        self.state.apply(AuthAction::LoggedOut);
    }

    /// Recompute `authenticated` from the stored access token
    pub fn check_auth(&self) -> bool {
        let session = self.service.session();
        let authenticated = session.is_authenticated();
        self.state.apply(AuthAction::SessionChecked {
            authenticated,
            claims: session.claims().cloned(),
        });
        authenticated
    }

    /// Claims of the stored access token
    pub fn current_claims(&self) -> Option<TokenClaims> {
        self.service.current_claims()
    }

    pub fn clear_errors(&self) {
        self.state.apply(AuthAction::ClearError);
    }
}
