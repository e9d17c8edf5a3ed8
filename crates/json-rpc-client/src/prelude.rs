//! # JSON-RPC Client Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! and traits from the client library.
//!
//! ```rust
//! use json_rpc_client::prelude::*;
//! ```

// Core client types
pub use crate::client::{JsonRpcClient, JsonRpcClientBuilder, RpcCall};
pub use crate::config::{ClientConfig, ConfigOverride, IdGenerator};
pub use crate::contract::{RpcContract, RpcMethod, TypedCall, Untyped};
pub use crate::error::{ClientError, ClientResult};
pub use crate::observer::{RpcObserver, TracingObserver};

// Transport types
pub use crate::transport::{HttpTransport, Transport, TransportResponse};

// Re-export protocol types for convenience
pub use json_rpc_protocol::prelude::*;
