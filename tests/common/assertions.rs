//! Custom assertion macros and utilities
//!
//! Provides assertion macros for the shapes that show up over and over in the
//! store tests.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a store snapshot finished without an error
#[macro_export]
macro_rules! assert_settled {
    ($state:expr) => {
        let state = &$state;
        assert!(!state.loading, "store is still loading");
        assert!(
            state.error.is_none(),
            "store recorded an error: {:?}",
            state.error
        );
    };
}

/// Assert that a store snapshot finished with exactly this error message
#[macro_export]
macro_rules! assert_store_error {
    ($state:expr, $message:expr) => {
        let state = &$state;
        assert!(!state.loading, "store is still loading");
        assert_eq!(state.error.as_deref(), Some($message));
    };
}
