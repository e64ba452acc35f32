/**
 * Domain Stores
 *
 * Each store owns one plain state struct the view layer renders from. State lives
 * in a `tokio::sync::watch` channel: views call `subscribe()` to be told about
 * changes and `snapshot()` to read a copy.
 *
 * # Transitions
 *
 * State never changes in place from an operation. Operations dispatch actions and
 * the state's `Reducer::reduce` computes the next state, so every transition can
 * be unit tested without a network.
 *
 * Every operation follows the same shape:
 *
 * 1. dispatch `Started` (loading on, previous error cleared)
 * 2. await the service call
 * 3. dispatch one success action, or `Failed` with a display message
 *
 * Stores never retry. Recovering from an expired access token is the HTTP
 * client's job.
 */

use tokio::sync::watch;

/// Authentication store
pub mod auth;

/// File store
pub mod files;

/// User profile store
pub mod user;

pub use auth::{AuthAction, AuthState, AuthStore};
pub use files::{FileAction, FileState, FileStore};
pub use user::{UserAction, UserState, UserStore};

/// Pure state transition
pub trait Reducer: Default {
    type Action;

    /// Compute the state that follows `action`
    fn reduce(self, action: Self::Action) -> Self;
}

/// Observable state container
#[derive(Debug)]
pub struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S: Reducer + Clone> Default for StateCell<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Reducer + Clone> StateCell<S> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(S::default());
        Self { tx }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Apply one action
    ///
    /// Works with or without subscribers, so completions that land after every
    /// view went away are harmless.
    pub fn apply(&self, action: S::Action) {
        self.tx.send_modify(|state| {
            let current = std::mem::take(state);
            *state = current.reduce(action);
        });
    }
}
