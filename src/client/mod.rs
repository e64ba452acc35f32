//! Client Module
//!
//! The API client and the state the view layer binds to. Built bottom-up:
//!
//! - `credentials` - tokens mirrored into durable storage and a cookie jar
//! - `http` - `ApiClient`, bearer attachment and refresh-and-retry
//! - `services` - one method per REST endpoint
//! - `stores` - observable auth, file and user state
//! - `state` - `ClientContext` wiring it all together

/// Client configuration
pub mod config;

/// API client error types
pub mod error;

/// Credential store and its backends
pub mod credentials;

/// Navigation side effect
pub mod navigation;

/// HTTP client wrapper
pub mod http;

/// Upload and download payloads
pub mod transfer;

/// REST endpoint clients
pub mod services;

/// Domain stores
pub mod stores;

/// Client context
pub mod state;

pub use config::Config;
pub use credentials::{CredentialStore, StorageError, TokenKind, TokenStorage};
pub use error::ApiError;
pub use http::{ApiClient, ApiRequest, Attempt};
pub use navigation::{HistoryNavigator, Navigator};
pub use state::ClientContext;
pub use stores::{AuthStore, FileStore, UserStore};
pub use transfer::{DownloadedFile, UploadFile};
