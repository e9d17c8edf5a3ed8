//! # JSON-RPC 2.0 Protocol Types
//!
//! Transport-agnostic building blocks for a JSON-RPC 2.0 client. This crate knows
//! how requests look on the wire and what a well-formed reply is; it never talks
//! to a network.
//!
//! ## Features
//! - Request envelopes with `params`/`id` omitted (never `null`) when absent
//! - Structural reply validation with deterministic, ordered checks
//! - A two-variant [`RpcOutcome`] for success and application-error replies
//! - Id-based correlation of batch replies with positional fallback

pub mod batch;
pub mod envelope;
pub mod error;
pub mod outcome;
pub mod prelude;
pub mod reply;
pub mod types;

// Re-export main types
pub use batch::correlate;
pub use envelope::{InvalidCallError, JsonRpcCall, JsonRpcParams};
pub use error::{JsonRpcErrorCode, JsonRpcErrorObject};
pub use outcome::RpcOutcome;
pub use reply::{InvalidReplyError, InvalidReplyReason, ReplyPayload, ReplyValidator, ValidatedReply};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
