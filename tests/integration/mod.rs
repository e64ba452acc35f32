//! Integration tests
//!
//! Every test runs a client context against a wiremock server.

pub mod credentials;
pub mod refresh_flow;
