pub mod auth_gate;
pub mod page;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const SIGN_IN_ROUTE: &str = "/sign-in";
pub const HOME_ROUTE: &str = "/";

/// Requests navigation to another route. The engine only ever asks for
/// `/sign-in` and `/`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Transient user-visible notifications (toasts).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Tracks whether the page is still active. Deferred callbacks check this
/// before mutating form state so a notification arriving after teardown
/// is discarded instead of acting on a dead page.
#[derive(Debug, Clone)]
pub struct PageToken {
    active: Arc<AtomicBool>,
}

impl PageToken {
    pub fn new() -> PageToken {
        PageToken {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Default for PageToken {
    fn default() -> Self {
        PageToken::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_active_and_stays_down() {
        let token = PageToken::new();
        assert!(token.is_active());

        let clone = token.clone();
        token.deactivate();
        assert!(!clone.is_active());
    }
}
