//! Error types for the admission layer.

/// Errors that can occur while admitting a connection.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The credential was missing, malformed, expired, or rejected by the
    /// [`Authenticator`](crate::Authenticator). Terminal for the
    /// connection: the caller must close the transport without
    /// registering it.
    ///
    /// The `Display` string is the exact message sent to the client; the
    /// underlying reason is kept for server-side logging only.
    #[error("Unauthorized or invalid token")]
    Unauthorized {
        /// Why verification failed (never sent to the client).
        reason: String,
    },
}

impl SessionError {
    /// Shorthand for an [`Unauthorized`](Self::Unauthorized) error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}
