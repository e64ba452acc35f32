/**
 * Edge Server
 *
 * Serves the page directory with every navigation passing through the session
 * guard first.
 *
 * # Environment
 *
 * - `EDGE_PORT` - listen port (default 3000)
 * - `EDGE_PAGES_DIR` - directory of pages to serve (default `./pages`)
 * - plus everything `client::Config::from_env` reads for the route table
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::client::Config;
use crate::edge::middleware::session_guard;
use crate::shared::config::ConfigError;
use crate::shared::guard::RouteTable;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default page directory
pub const DEFAULT_PAGES_DIR: &str = "./pages";

/// Edge server settings
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub port: u16,
    pub pages_dir: PathBuf,
    pub routes: RouteTable,
}

impl EdgeConfig {
    /// Read settings from the environment
    ///
    /// An unparsable `EDGE_PORT` falls back to the default with a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client = Config::from_env()?;

        let port = match std::env::var("EDGE_PORT") {
            Ok(raw) => raw.parse::<u16>().unwrap_or_else(|e| {
                tracing::warn!("[Edge] Invalid EDGE_PORT {:?} ({}), using {}", raw, e, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let pages_dir = std::env::var("EDGE_PAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PAGES_DIR));

        Ok(Self {
            port,
            pages_dir,
            routes: client.routes().clone(),
        })
    }
}

/// Wrap `router` so every request passes the session guard
pub fn with_session_guard(router: Router, routes: RouteTable) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        Arc::new(routes),
        session_guard,
    ))
}

/// Create the edge application: the page directory behind the guard
pub fn create_app(routes: RouteTable, pages_dir: impl AsRef<Path>) -> Router {
    tracing::info!("[Edge] Serving pages from {}", pages_dir.as_ref().display());
    let pages = ServeDir::new(pages_dir.as_ref()).append_index_html_on_directories(true);
    with_session_guard(Router::new().fallback_service(pages), routes)
}
