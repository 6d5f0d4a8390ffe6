//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-2xx response.
    #[error("{method} {path} failed with status {status}: {message}")]
    Api {
        /// HTTP method of the failed request.
        method: String,
        /// Endpoint path of the failed request.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Response body, or a generic description when the body was empty.
        message: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session was deleted and can no longer be used.
    #[error("session {0} has been deleted")]
    SessionDeleted(String),

    /// A reply referenced a message this session never received.
    #[error("message {message_id} was not received in session {session_id}")]
    UnknownMessage {
        /// Session the reply was submitted to.
        session_id: String,
        /// Id of the message being replied to.
        message_id: String,
    },

    /// A task selection named an option the message did not offer.
    #[error("option '{key}' is not offered by task selection {message_id}")]
    InvalidSelection {
        /// Id of the task selection message.
        message_id: String,
        /// The offending option key.
        key: String,
    },

    /// A task selection was submitted without any option.
    #[error("task selection {0} requires at least one option")]
    EmptySelection(String),

    /// Sharing needs a user id or an email to address.
    #[error("a target user id or email is required to share a function group")]
    MissingShareTarget,

    /// Number of credit values fetched differs from the number of models requested.
    #[error("credit count mismatch: requested {expected} models, received {actual} values")]
    CreditMismatch {
        /// Number of models requested.
        expected: usize,
        /// Number of credit values received.
        actual: usize,
    },
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api { status: 429, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if this error is a caller precondition violation rather than a remote failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::SessionDeleted(_)
                | Error::UnknownMessage { .. }
                | Error::InvalidSelection { .. }
                | Error::EmptySelection(_)
                | Error::MissingShareTarget
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
