//! Feishu client error types.

use thiserror::Error;

/// Errors raised while talking to the Feishu Open API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials are missing or the client could not be built.
    #[error("{0}")]
    Config(String),

    /// The tenant access token could not be obtained.
    #[error("Failed to obtain tenant access token: {0}")]
    Auth(String),

    /// The server answered with a non-2xx status. `message` is taken from
    /// the response body when it carries one.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// Connection, timeout or other transport-level failure.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request cannot be addressed, e.g. an identifier is empty.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response body was not the expected JSON envelope.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether this error comes from missing or invalid configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
