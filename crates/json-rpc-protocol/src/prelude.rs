//! # JSON-RPC Protocol Prelude
//!
//! Convenient re-exports of the most commonly used protocol types.
//!
//! ```rust
//! use json_rpc_protocol::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::batch::correlate;
pub use crate::envelope::{JsonRpcCall, JsonRpcParams};
pub use crate::error::{JsonRpcErrorCode, JsonRpcErrorObject};
pub use crate::outcome::RpcOutcome;
pub use crate::reply::{InvalidReplyError, ReplyPayload, ReplyValidator, ValidatedReply};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
