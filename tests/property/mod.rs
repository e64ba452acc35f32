//! Property-based tests

pub mod claims_proptest;
pub mod guard_proptest;
pub mod store_proptest;
