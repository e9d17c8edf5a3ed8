//! Error types for JSON-RPC client operations
//!
//! Application-level JSON-RPC errors are *not* represented here: a server that
//! answers with an error object yields [`json_rpc_protocol::RpcOutcome::Failure`].
//! Everything in this module means the exchange itself went wrong.

use json_rpc_protocol::{InvalidReplyError, envelope::InvalidCallError};
use thiserror::Error;

/// Result type for JSON-RPC client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error type for JSON-RPC client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The call could not be turned into a valid request envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server's reply violates JSON-RPC 2.0
    #[error(transparent)]
    InvalidReply(#[from] InvalidReplyError),

    /// Network-level failure; the exchange never produced a reply
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Serializing params or decoding a typed result failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no url set")]
    MissingUrl,

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Transport-specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl From<InvalidCallError> for ClientError {
    fn from(err: InvalidCallError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl ClientError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Check if the error came from the transport layer
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the server sent a structurally invalid reply
    pub fn is_invalid_reply(&self) -> bool {
        matches!(self, Self::InvalidReply(_))
    }

    /// Check if the error is a configuration issue
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
