//! Interrupt handling for a running retrieval.
//!
//! SIGINT (Ctrl+C) and SIGHUP both cancel the session. Pending rate-limit
//! and backoff waits end early, and the retriever returns what it has so far.

use tracing::debug;

use crate::discord::CancelToken;

/// Connects process signals to a [`CancelToken`].
pub struct InterruptGuard {
    token: CancelToken,
}

impl Default for InterruptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptGuard {
    pub fn new() -> Self {
        Self {
            token: CancelToken::new(),
        }
    }

    /// Register SIGINT and SIGHUP handlers.
    ///
    /// Both set the token's flag. Calling this twice is harmless; the
    /// second ctrlc registration is ignored.
    pub fn register_signal_handlers(&self) {
        let token = self.token.clone();
        if ctrlc::set_handler(move || token.cancel()).is_err() {
            debug!("ctrl-c handler already installed");
        }

        #[cfg(unix)]
        {
            use signal_hook::consts::SIGHUP;
            use signal_hook::flag::register;
            let _ = register(SIGHUP, self.token.flag());
        }
    }

    /// Token handed to the retriever.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Whether a signal arrived.
    pub fn is_interrupted(&self) -> bool {
        self.token.is_cancelled()
    }
}
