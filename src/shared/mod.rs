//! Shared Module
//!
//! Types used on both sides of the edge: by the API client when it decides whether
//! the user is signed in, and by the edge middleware when it decides whether a page
//! may be rendered. Nothing in here performs I/O.

/// Application configuration
pub mod config;

/// Error-body normalization for API responses
pub mod error;

/// Records exchanged with the REST API
pub mod models;

/// Unverified JWT claims decoding
pub mod claims;

/// Derived session state
pub mod session;

/// Route classification and the session guard decision
pub mod guard;

pub use claims::{decode_unverified, ClaimsError, TokenClaims};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::ErrorBody;
pub use guard::{GuardDecision, RouteClass, RouteTable};
pub use session::SessionState;
