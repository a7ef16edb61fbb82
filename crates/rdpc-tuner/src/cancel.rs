//! Cooperative cancellation with deferred sections
//!
//! A [`CancelToken`] is shared between the controlling thread and whatever
//! receives the termination request (typically a signal handler). The
//! request is only acted upon at [`CancelToken::checkpoint`], and never
//! while a [`DeferGuard`] is alive, so a mute/seek/poll/unmute sequence
//! always runs to completion once started.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::TunerError;

#[derive(Debug, Default)]
struct CancelState {
    requested: AtomicBool,
    deferred: AtomicUsize,
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; safe to call from any thread
    pub fn cancel(&self) {
        self.state.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.requested.load(Ordering::SeqCst)
    }

    /// True while at least one deferred section is active
    pub fn is_deferred(&self) -> bool {
        self.state.deferred.load(Ordering::SeqCst) > 0
    }

    /// Enter a section that cancellation must not interrupt
    ///
    /// Sections nest; the request is delivered once the outermost guard
    /// is dropped.
    pub fn defer(&self) -> DeferGuard<'_> {
        self.state.deferred.fetch_add(1, Ordering::SeqCst);
        DeferGuard { token: self }
    }

    /// Fail with [`TunerError::Cancelled`] if cancellation was requested
    /// and no deferred section is active
    pub fn checkpoint(&self) -> Result<(), TunerError> {
        if self.is_cancelled() && !self.is_deferred() {
            Err(TunerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Marks a deferred section for as long as it lives
#[must_use = "the section ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DeferGuard<'a> {
    token: &'a CancelToken,
}

impl Drop for DeferGuard<'_> {
    fn drop(&mut self) {
        let prev = self.token.state.deferred.fetch_sub(1, Ordering::SeqCst);
        if prev == 1 && self.token.is_cancelled() {
            debug!("Delivering deferred cancellation");
        }
    }
}
