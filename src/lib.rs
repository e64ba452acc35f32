//! filedesk - file management client library
//!
//! filedesk is the client half of a small file-management product: users sign in,
//! upload documents, browse and download them, look at a dashboard summarizing what
//! they uploaded and keep a profile with postal addresses. The server is an external
//! REST API; this crate owns everything on the client side of that API.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the client and the edge server
//!   - Configuration, API records, error-body normalization
//!   - Token claims decoding and the session guard decision
//!
//! - **`client`** - The API client
//!   - Credential store (durable storage mirrored into a cookie jar)
//!   - HTTP client wrapper with bearer attachment and refresh-and-retry on 401
//!   - Domain stores (auth, files, user) the view layer binds to
//!
//! - **`edge`** - Edge server (only compiled with `ssr` feature)
//!   - Axum middleware that guards page routes using the access token cookie
//!   - Static page server binary `filedesk-edge`
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the edge middleware and server (axum, tower-http,
//!   tracing-subscriber, dotenv)
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use filedesk::client::{ClientContext, Config, HistoryNavigator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let navigator = Arc::new(HistoryNavigator::default());
//! let ctx = ClientContext::new(config, navigator);
//!
//! ctx.auth.login("ada@example.com", "correct horse").await;
//! if ctx.auth.snapshot().authenticated {
//!     ctx.files.load_dashboard().await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `ApiError` for everything that crosses the network
//! - `ClaimsError`, `StorageError`, `ConfigError` for local failures
//! - Stores never surface errors as `Err`; they record a display string in state

/// Shared types and data structures
pub mod shared;

/// API client, credential store and domain stores
pub mod client;

/// Edge middleware and server
#[cfg(feature = "ssr")]
pub mod edge;
