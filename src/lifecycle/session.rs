// ABOUTME: View-session tokens used to drop late continuations
// A continuation applies its result only if the view that started it is still current

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Identity of the view (modal, panel) that owns some transient state.
///
/// Closing or tearing down the view calls [`ViewSession::invalidate`]; any call
/// still in flight then sees a stale token and must not write back.
#[derive(Debug, Clone)]
pub struct ViewSession {
    id: Uuid,
    epoch: Arc<AtomicU64>,
}

/// Snapshot of a session taken when an async call is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken {
    session: Uuid,
    epoch: u64,
}

impl ViewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn token(&self) -> SessionToken {
        SessionToken {
            session: self.id,
            epoch: self.epoch.load(Ordering::SeqCst),
        }
    }

    pub fn is_current(&self, token: &SessionToken) -> bool {
        token.session == self.id && token.epoch == self.epoch.load(Ordering::SeqCst)
    }

    /// Invalidate every outstanding token. Later tokens are valid again.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for ViewSession {
    fn default() -> Self {
        Self::new()
    }
}
