//! Edge Module
//!
//! Server-side half of the session guard: an axum middleware that checks the
//! access token cookie before a page is served, and the small static server the
//! `filedesk-edge` binary runs.

/// Session guard middleware
pub mod middleware;

/// Edge server assembly
pub mod server;

pub use middleware::{cookie_value, session_guard};
pub use server::{create_app, with_session_guard, EdgeConfig};
