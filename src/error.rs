//! Error types for the TableTop client library.

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, TableTopError>;

/// All errors that can occur when using the TableTop client.
#[derive(Debug, thiserror::Error)]
pub enum TableTopError {
    /// Transport-level failure — the request never produced a response.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-supplied error message, or the raw body when no
        /// structured message was present.
        message: String,
    },

    /// The operation requires a signed-in identity and none is active.
    #[error("not authenticated: sign in first")]
    NotAuthenticated,

    /// The server rejected the request due to ownership or role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested booking status change is not permitted.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Internal misuse of a component contract (e.g. patching the
    /// session store while no identity is active).
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    /// A submission was rejected by client-side policy before any
    /// network call was made.
    #[error("policy violation: {0}")]
    Policy(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session storage backend failed.
    #[error("session storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),
}

impl TableTopError {
    /// Returns `true` if this error is an authentication rejection
    /// (HTTP 401) from the server.
    ///
    /// By the time a caller observes this error the session store has
    /// already been cleared; callers typically use this to also drop
    /// durable session state.
    #[inline]
    #[must_use]
    pub const fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}
