//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Token minting
//! - A mock API server wired to a client context
//! - Custom assertion macros

pub mod assertions;
pub mod mock_api;
pub mod tokens;

// Re-export commonly used utilities
pub use mock_api::*;
pub use tokens::*;
