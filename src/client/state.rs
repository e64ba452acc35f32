use std::sync::Arc;

use crate::client::config::Config;
use crate::client::credentials::{CredentialStore, FileStorage, TokenStorage};
use crate::client::http::ApiClient;
use crate::client::navigation::Navigator;
use crate::client::services::{AuthService, FileService, UserService};
use crate::client::stores::{AuthStore, FileStore, UserStore};

/// Everything a view layer needs, wired together once.
///
/// Stores are handed out explicitly instead of living in globals, so a test can
/// build as many independent contexts as it likes.
pub struct ClientContext {
    pub config: Config,
    pub credentials: Arc<CredentialStore>,
    pub client: Arc<ApiClient>,
    pub auth: AuthStore,
    pub files: FileStore,
    pub user: UserStore,
}

impl ClientContext {
    /// Build a context persisting credentials under `config.storage_path()`
    pub fn new(config: Config, navigator: Arc<dyn Navigator>) -> Self {
        let durable = FileStorage::new(config.storage_path());
        tracing::debug!("[ClientContext] Credentials at {}", durable.path().display());
        Self::with_storage(config, Box::new(durable), navigator)
    }

    /// Build a context over a specific durable backend
    pub fn with_storage(
        config: Config,
        durable: Box<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new(durable, config.cookie_ttl()));
        Self::with_credentials(config, credentials, navigator)
    }

    /// Build a context sharing an existing credential store
    pub fn with_credentials(
        config: Config,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Arc::new(ApiClient::new(
            config.clone(),
            credentials.clone(),
            navigator,
        ));

        Self {
            auth: AuthStore::new(AuthService::new(client.clone())),
            files: FileStore::new(FileService::new(client.clone())),
            user: UserStore::new(UserService::new(client.clone())),
            config,
            credentials,
            client,
        }
    }
}
