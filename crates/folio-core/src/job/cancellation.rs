/*
 * job/cancellation.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Cooperative cancellation for render jobs.
 */

//! Cooperative cancellation for render jobs.
//!
//! [`Cancellation`] wraps `tokio_util::sync::CancellationToken`. Each
//! job owns one token; the pipeline polls it at stage boundaries, so
//! cancellation takes effect at the next boundary rather than
//! interrupting a stage mid-flight.

/// A cancellation token shared between a job and its controller.
#[derive(Clone, Default)]
pub struct Cancellation {
    inner: tokio_util::sync::CancellationToken,
}

impl Cancellation {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Request cancellation.
    ///
    /// After this is called, `is_cancelled()` will return `true`.
    pub fn cancel(&self) {
        self.inner.cancel()
    }
}

impl From<tokio_util::sync::CancellationToken> for Cancellation {
    fn from(token: tokio_util::sync::CancellationToken) -> Self {
        Self { inner: token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_not_cancelled() {
        let token = Cancellation::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_sets_flag() {
        let token = Cancellation::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_clone_shares_state() {
        let token1 = Cancellation::new();
        let token2 = token1.clone();

        assert!(!token1.is_cancelled());
        assert!(!token2.is_cancelled());

        token1.cancel();

        assert!(token1.is_cancelled());
        assert!(token2.is_cancelled());
    }
}
