//! Navigation side effect.
//!
//! When a session cannot be recovered the client sends the user to the login page.
//! The client does not own a window, so the move is delegated to a `Navigator`
//! supplied by whoever embeds it.

use std::sync::Mutex;

/// Performs full page navigations
pub trait Navigator: Send + Sync {
    /// Navigate to `path`, discarding the current page
    fn navigate(&self, path: &str);
}

/// Navigator that records every navigation
///
/// Useful for headless embedding and tests: `current()` is the page the user would
/// be looking at.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation target
    pub fn current(&self) -> Option<String> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.last().cloned()
    }

    /// All navigation targets, oldest first
    pub fn history(&self) -> Vec<String> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.clone()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!("[Navigation] -> {}", path);
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.push(path.to_string());
    }
}
