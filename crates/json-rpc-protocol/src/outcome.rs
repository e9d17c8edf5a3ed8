use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcErrorObject;
use crate::reply::{ReplyPayload, ValidatedReply};
use crate::types::RequestId;

/// Outcome of a validated JSON-RPC reply.
///
/// A server that answered with an error object produces `Failure`: that is the
/// expected, recoverable path and is returned as data. Only malformed replies
/// and transport failures become Rust errors, and those never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RpcOutcome<T> {
    #[serde(rename = "success")]
    Success {
        value: T,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<RequestId>,
    },
    #[serde(rename = "error")]
    Failure {
        error: JsonRpcErrorObject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<RequestId>,
    },
}

impl<T> RpcOutcome<T> {
    pub fn success(value: T, id: Option<RequestId>) -> Self {
        RpcOutcome::Success { value, id }
    }

    pub fn failure(error: JsonRpcErrorObject, id: Option<RequestId>) -> Self {
        RpcOutcome::Failure { error, id }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RpcOutcome::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn into_result(self) -> Result<T, JsonRpcErrorObject> {
        match self {
            RpcOutcome::Success { value, .. } => Ok(value),
            RpcOutcome::Failure { error, .. } => Err(error),
        }
    }

    /// Transform the success value, keeping the correlation id; a failing
    /// transform aborts the whole conversion.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<RpcOutcome<U>, E> {
        Ok(match self {
            RpcOutcome::Success { value, id } => RpcOutcome::Success {
                value: f(value)?,
                id,
            },
            RpcOutcome::Failure { error, id } => RpcOutcome::Failure { error, id },
        })
    }
}

impl RpcOutcome<Value> {
    /// Decode the untyped success payload into `T`
    pub fn decode<T: DeserializeOwned>(self) -> Result<RpcOutcome<T>, serde_json::Error> {
        self.try_map(serde_json::from_value)
    }
}

impl From<ValidatedReply> for RpcOutcome<Value> {
    fn from(reply: ValidatedReply) -> Self {
        match reply.payload {
            ReplyPayload::Error(error) => RpcOutcome::failure(error, reply.id),
            ReplyPayload::Result(value) => RpcOutcome::success(value, reply.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::ReplyValidator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn outcome(raw: Value) -> RpcOutcome<Value> {
        ReplyValidator::assert_single(&raw).unwrap().into()
    }

    #[test]
    fn test_success_carries_value_and_id() {
        let result = outcome(json!({"jsonrpc": "2.0", "id": "abc", "result": {"name": "john"}}));

        assert!(result.is_success());
        assert!(!result.is_error());
        assert_eq!(
            result,
            RpcOutcome::success(json!({"name": "john"}), Some(RequestId::from("abc")))
        );
    }

    #[test]
    fn test_error_reply_is_never_success() {
        let error = json!({"code": -32601, "message": "Method not found"});
        let result = outcome(json!({"jsonrpc": "2.0", "id": 9, "error": error}));

        assert!(result.is_error());
        assert!(!result.is_success());
        match result {
            RpcOutcome::Failure { error: e, id } => {
                assert_eq!(serde_json::to_value(&e).unwrap(), error);
                assert_eq!(id, Some(RequestId::from(9)));
            }
            RpcOutcome::Success { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_tagged_serialization() {
        let ok: RpcOutcome<Value> = RpcOutcome::success(json!({"foo": 1}), None);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"type": "success", "value": {"foo": 1}})
        );

        let err: RpcOutcome<Value> =
            RpcOutcome::failure(JsonRpcErrorObject::new(1, "bad", None), Some(RequestId::from(1)));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "error", "error": {"code": 1, "message": "bad"}, "id": 1})
        );
    }

    #[test]
    fn test_decode() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Foo {
            name: String,
        }

        let typed = outcome(json!({"jsonrpc": "2.0", "id": null, "result": {"name": "john"}}))
            .decode::<Foo>()
            .unwrap();
        assert_eq!(typed.into_result().unwrap(), Foo { name: "john".into() });

        let mismatch = outcome(json!({"jsonrpc": "2.0", "id": null, "result": 5})).decode::<Foo>();
        assert!(mismatch.is_err());

        // Failures pass through untouched regardless of T
        let failure = outcome(json!({"jsonrpc": "2.0", "id": null, "error": {"code": 1, "message": "m"}}))
            .decode::<Foo>()
            .unwrap();
        assert!(failure.is_error());
    }
}
