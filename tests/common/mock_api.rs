//! Mock API helpers for integration tests
//!
//! `TestApp` starts a wiremock server and builds a `ClientContext` pointing at
//! it, with credentials kept in a temporary directory and navigation recorded.

use std::sync::Arc;

use filedesk::client::credentials::{FileStorage, TokenKind, TokenStorage};
use filedesk::client::{ClientContext, Config, HistoryNavigator};
use filedesk::shared::AppConfig;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::{MockServer, Request};

/// Client context wired to a mock API
pub struct TestApp {
    pub server: MockServer,
    pub ctx: ClientContext,
    pub navigator: Arc<HistoryNavigator>,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
        let (ctx, navigator) = Self::context_for(&server, &storage_dir);
        Self {
            server,
            ctx,
            navigator,
            storage_dir,
        }
    }

    /// Another context sharing this app's server and durable storage
    pub fn reopen(&self) -> (ClientContext, Arc<HistoryNavigator>) {
        Self::context_for(&self.server, &self.storage_dir)
    }

    fn context_for(server: &MockServer, dir: &TempDir) -> (ClientContext, Arc<HistoryNavigator>) {
        let config = Config::with_builder(
            AppConfig::builder()
                .api_base_url(format!("{}/api", server.uri()))
                .storage_dir(dir.path()),
        )
        .expect("Failed to build test config");
        let navigator = Arc::new(HistoryNavigator::new());
        let ctx = ClientContext::new(config, navigator.clone());
        (ctx, navigator)
    }

    /// Store a token pair as if the user had signed in earlier
    pub fn sign_in(&self, access: &str, refresh: &str) {
        self.ctx.credentials.set(TokenKind::Access, access);
        self.ctx.credentials.set(TokenKind::Refresh, refresh);
    }

    /// Value persisted in the durable backend, read directly from disk
    pub fn durable_value(&self, key: &str) -> Option<String> {
        FileStorage::new(self.storage_dir.path().join("credentials.json"))
            .load(key)
            .expect("Failed to read durable credentials")
    }
}

/// Matches requests that carry no Authorization header
pub struct NoAuthorization;

impl wiremock::Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

/// Bearer header value for `token`
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn file_json(id: i64, filename: &str) -> Value {
    json!({
        "id": id,
        "filename": filename,
        "file": format!("http://localhost:8000/media/uploads/user_1/{}", filename),
        "file_type": "txt",
        "file_type_display": "Text",
        "upload_date": "2024-05-01T10:30:00.000000Z",
        "size": 42,
        "file_size_display": "42 bytes"
    })
}

pub fn dashboard_json(total: u64) -> Value {
    json!({
        "total_files": total,
        "file_type_breakdown": {"Text": total}
    })
}

pub fn address_json(id: i64, city: &str) -> Value {
    json!({
        "id": id,
        "address_type": "home",
        "street_address": "221B Baker Street",
        "city": city,
        "state": "Greater London",
        "postal_code": "NW1 6XE",
        "country": "UK",
        "is_default": id == 1
    })
}

pub fn profile_json(addresses: Vec<Value>) -> Value {
    json!({
        "id": 1,
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone_number": "+44 20 7946 0000",
        "addresses": addresses
    })
}
