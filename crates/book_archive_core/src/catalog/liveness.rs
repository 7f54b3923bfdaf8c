//! Liveness token
//!
//! Remote calls are never cancelled; instead, whoever owns the catalog revokes the token when it
//! goes away, and late resolutions check it before touching state.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl Default for LivenessToken {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessToken {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the owner as gone. Every clone observes the change.
    #[inline]
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }

    #[must_use]
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}
