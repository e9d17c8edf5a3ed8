//! Hooks for watching the traffic of a client.
//!
//! Observers see every request body right before it is sent and every reply
//! right after it arrives, before validation. They cannot alter either.

use serde_json::Value;
use tracing::debug;

pub trait RpcObserver: Send + Sync {
    /// Called once the request body is built, before it is sent
    fn on_request(&self, url: &str, body: &Value) {
        let _ = (url, body);
    }

    /// Called with the raw reply, before validation
    fn on_reply(&self, status: u16, body: &Value) {
        let _ = (status, body);
    }
}

/// Logs full request and reply bodies at `debug` level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RpcObserver for TracingObserver {
    fn on_request(&self, url: &str, body: &Value) {
        debug!(url = url, body = %body, "JSON-RPC request");
    }

    fn on_reply(&self, status: u16, body: &Value) {
        debug!(status = status, body = %body, "JSON-RPC reply");
    }
}
