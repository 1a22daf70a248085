//! Tool-specific error types.
//!
//! Every variant is rendered into an error envelope by the registry; none
//! of them reaches the MCP client as a protocol error.

use thiserror::Error;

use crate::feishu::{ClientError, RemoteOutcome};

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The call carried no arguments object.
    #[error("Arguments are required")]
    MissingArguments,

    /// The requested tool was not found.
    #[error("Unsupported tool name: {0}")]
    NotFound(String),

    /// Arguments did not match the tool's schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A JSON-encoded string argument could not be parsed.
    #[error("Failed to parse '{argument}' as JSON: {message}")]
    InvalidJson { argument: String, message: String },

    /// The Feishu client could not be constructed.
    #[error("{0}")]
    Config(String),

    /// The remote answered with a logical failure.
    #[error("{0}")]
    Remote(String),

    /// The remote call itself failed.
    #[error("{0}")]
    Transport(String),

    /// Read-before-delete could not find the record.
    #[error("Record {record_id} could not be found or read: {reason}")]
    RecordNotFound { record_id: String, reason: String },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "invalid JSON" error for `argument`.
    pub fn invalid_json(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidJson {
            argument: argument.into(),
            message: message.into(),
        }
    }
}

impl From<ClientError> for ToolError {
    fn from(error: ClientError) -> Self {
        if error.is_config() {
            Self::Config(format!("Configuration error: {}", error))
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl RemoteOutcome {
    /// The success payload, or the failure as a [`ToolError`].
    pub fn into_payload(self) -> Result<serde_json::Value, ToolError> {
        match self {
            Self::Ok(payload) => Ok(payload),
            Self::RemoteFailure(message) => Err(ToolError::Remote(message)),
            Self::TransportFailure(message) => Err(ToolError::Transport(message)),
        }
    }
}
