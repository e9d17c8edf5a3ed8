use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::JsonRpcVersion;

/// Named parameters of a call
pub type JsonRpcParams = Map<String, Value>;

/// Rejected call construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCallError {
    #[error("method name must not be empty")]
    EmptyMethod,

    #[error("params must serialize to a JSON object, got {0}")]
    ParamsNotObject(String),
}

/// An outbound JSON-RPC request envelope.
///
/// `params` and `id` are left out of the serialized form when absent; a call
/// without an id asks for no correlation rather than sending `"id": null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcCall {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonRpcParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl JsonRpcCall {
    pub fn new(
        method: impl Into<String>,
        params: Option<JsonRpcParams>,
        id: Option<String>,
    ) -> Result<Self, InvalidCallError> {
        let method = method.into();
        if method.is_empty() {
            return Err(InvalidCallError::EmptyMethod);
        }

        Ok(Self {
            version: JsonRpcVersion::V2_0,
            method,
            params,
            id,
        })
    }

    /// Wire form of the call, as produced by its `Serialize` impl
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

pub fn params_from_value(value: Value) -> Result<Option<JsonRpcParams>, InvalidCallError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(InvalidCallError::ParamsNotObject(other.to_string())),
    }
}

/// Serialize a batch as a single JSON array body
pub fn batch_to_value(calls: &[JsonRpcCall]) -> serde_json::Result<Value> {
    serde_json::to_value(calls)
}
