//! Transport layer for the JSON-RPC client
//!
//! The client hands a fully built JSON body to a [`Transport`] and gets back
//! the decoded reply. Transports own everything HTTP-shaped: TLS, redirects,
//! connection reuse and timeouts.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TransportError;

pub mod http;

pub use http::HttpTransport;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport response containing status and decoded body
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status; informational only, classification looks at the body
    pub status: u16,
    /// Response body (JSON)
    pub body: Value,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Transport trait defining the single operation the client needs.
///
/// Implementations must deliver every HTTP status, 4xx and 5xx included, as a
/// [`TransportResponse`]. Only failures where no response arrived at all
/// (DNS, refused connection, reset) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with `headers` and return the decoded reply
    async fn send(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> TransportResult<TransportResponse>;
}

/// Type alias for a shared transport
pub type SharedTransport = Arc<dyn Transport>;

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> TransportResult<TransportResponse> {
        (**self).send(url, headers, body).await
    }
}
