//! # JSON-RPC 2.0 Client
//!
//! An HTTP client for JSON-RPC 2.0 endpoints. Replies are validated against the
//! protocol's structural rules and returned as [`RpcOutcome`], so an error
//! reported by the server is ordinary data rather than a Rust error.
//!
//! ## Features
//!
//! - **Single and batch calls**: batches travel as one POST and are matched back
//!   to their requests by id
//! - **Strict reply validation**: malformed replies surface as
//!   [`ClientError::InvalidReply`] with the offending payload
//! - **Typed contracts**: declare a method table once with [`rpc_contract!`] and
//!   get checked params and decoded results
//! - **Pluggable transport**: anything implementing [`Transport`]; HTTP via
//!   `reqwest` by default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use json_rpc_client::{ClientConfig, IdGenerator, JsonRpcClient, RpcOutcome};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client: JsonRpcClient = JsonRpcClient::new(
//!         ClientConfig::new("http://localhost:8080/rpc").with_id_generator(IdGenerator::uuid_v4()),
//!     )?;
//!
//!     let params = json!({"fooId": 123}).as_object().cloned();
//!     match client.call::<Value>("getFoo", params).await? {
//!         RpcOutcome::Success { value, .. } => println!("foo: {}", value),
//!         RpcOutcome::Failure { error, .. } => println!("server said no: {}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod observer;
pub mod prelude;
pub mod transport;

// Re-export main types
pub use client::{JsonRpcClient, JsonRpcClientBuilder, RpcCall};
pub use config::{ClientConfig, ConfigOverride, IdGenerator};
pub use contract::{ContractBatch, RpcContract, RpcMethod, TypedCall, Untyped};
pub use error::{ClientError, ClientResult, ConfigError, TransportError};
pub use observer::{RpcObserver, TracingObserver};

// Re-export transport types
pub use transport::{HttpTransport, Transport, TransportResponse};

// Re-export protocol types for convenience
pub use json_rpc_protocol::{
    InvalidReplyError, InvalidReplyReason, JsonRpcErrorCode, JsonRpcErrorObject, JsonRpcParams,
    RequestId, RpcOutcome,
};
