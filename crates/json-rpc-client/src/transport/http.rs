//! HTTP transport implementation for the JSON-RPC client

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{Transport, TransportResponse, TransportResult};

/// HTTP POST transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new() -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("json-rpc-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create HTTP transport with custom client (timeouts, TLS, proxies)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn header_map(headers: &HashMap<String, String>) -> TransportResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    /// Handle HTTP response; every status is delivered to the caller
    async fn handle_response(response: Response) -> TransportResult<TransportResponse> {
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(
            status = status.as_u16(),
            bytes = bytes.len(),
            "Received HTTP response"
        );

        Ok(TransportResponse::new(status.as_u16(), decode_body(&bytes)))
    }
}

/// Decode a response body.
///
/// Bodies that are not JSON are handed on as a JSON string so reply
/// validation can report them verbatim; an empty body becomes `null`.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> TransportResult<TransportResponse> {
        let mut header_map = Self::header_map(headers)?;
        header_map
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));

        debug!(url = url, "Sending JSON-RPC POST");

        let payload = serde_json::to_vec(body)
            .map_err(|e| TransportError::Http(format!("Failed to encode body: {}", e)))?;

        let response = self
            .client
            .post(url)
            .headers(header_map)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::ConnectionFailed(e.to_string())
                } else {
                    TransportError::Request(e)
                }
            })?;

        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(br#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(
            decode_body(b"<html>Bad Gateway</html>"),
            json!("<html>Bad Gateway</html>")
        );
    }

    #[test]
    fn test_header_map() {
        let headers = HashMap::from([("x-api-key".to_string(), "secret".to_string())]);
        let map = HttpTransport::header_map(&headers).unwrap();
        assert_eq!(map.get("x-api-key").unwrap(), "secret");

        let bad = HashMap::from([("bad header".to_string(), "v".to_string())]);
        assert!(matches!(
            HttpTransport::header_map(&bad),
            Err(TransportError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_transport_creation() {
        assert!(HttpTransport::new().is_ok());
    }
}
