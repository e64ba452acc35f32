//! Property-based tests for store transitions

use filedesk::client::stores::{FileAction, FileState, Reducer};
use proptest::prelude::*;

fn file_action() -> impl Strategy<Value = FileAction> {
    prop_oneof![
        Just(FileAction::Started),
        Just(FileAction::UploadStarted),
        any::<u8>().prop_map(FileAction::UploadProgress),
        Just(FileAction::Uploaded),
        Just(FileAction::Finished),
        "[a-z ]{1,20}".prop_map(FileAction::Failed),
        "[a-z ]{1,20}".prop_map(FileAction::Error),
        Just(FileAction::ClearError),
        any::<i64>().prop_map(FileAction::Removed),
    ]
}

proptest! {
    #[test]
    fn test_upload_progress_stays_in_range(actions in prop::collection::vec(file_action(), 0..40)) {
        let mut state = FileState::default();
        for action in actions {
            state = state.reduce(action);
            if let Some(progress) = state.upload_progress {
                prop_assert!(progress <= 100);
            }
        }
    }

    #[test]
    fn test_failure_always_settles(actions in prop::collection::vec(file_action(), 0..20), message in "[a-z]{1,10}") {
        let mut state = FileState::default();
        for action in actions {
            state = state.reduce(action);
        }
        state = state.reduce(FileAction::Failed(message.clone()));

        prop_assert!(!state.loading);
        prop_assert_eq!(state.error, Some(message));
        prop_assert_eq!(state.upload_progress, None);
    }
}
