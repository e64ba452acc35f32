//! API Services
//!
//! One thin client per API area. Each method maps to exactly one endpoint and goes
//! through `ApiClient::send`, so every call gets bearer attachment and
//! refresh-and-retry for free. Services hold no state of their own.

/// Login, registration, sign-out
pub mod auth;

/// File list, upload, download, delete and dashboards
pub mod files;

/// Profile, password and addresses
pub mod users;

pub use auth::AuthService;
pub use files::FileService;
pub use users::UserService;
