//! Structural validation of inbound JSON-RPC replies.
//!
//! Checks run in a fixed order and the first failure wins, so the same bad
//! reply always produces the same diagnostic:
//!
//! 1. the reply is an object (batches: an array of objects)
//! 2. `jsonrpc` is present and equals `"2.0"`
//! 3. `id` is present; `null` is accepted, other values must be a string or integer
//! 4. `result` and `error` are not both truthy
//! 5. `error`, when present, is an object with `code` and `message`
//! 6. at least one of `result` / `error` is present
//!
//! Payloads are not inspected beyond that.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::JsonRpcErrorObject;
use crate::types::RequestId;

/// Why a reply was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReplyReason {
    #[error("reply is not an object")]
    NotAnObject,

    #[error("batch reply is not an array")]
    NotAnArray,

    #[error(r#"reply must contain "jsonrpc": "2.0""#)]
    MissingVersion,

    #[error(r#"unsupported "jsonrpc" version {0}"#)]
    UnsupportedVersion(String),

    #[error("reply must have an id member (null when the request had none)")]
    MissingId,

    #[error("reply id must be a string, an integer or null, got {0}")]
    InvalidId(String),

    #[error("result and error members must not exist together")]
    ResultAndError,

    #[error(r#""error" member must be an object"#)]
    ErrorNotObject,

    #[error(r#"invalid "error" member shape: {0}"#)]
    MalformedError(String),

    #[error("reply contains neither result nor error")]
    MissingOutcome,

    #[error("batch element {index}: {reason}")]
    BatchElement {
        index: usize,
        reason: Box<InvalidReplyReason>,
    },

    #[error("batch contains more than one reply with id {0}")]
    DuplicateReplyId(String),

    #[error("no reply received for request id {0}")]
    MissingReply(String),

    #[error("batch had {expected} uncorrelated requests but {actual} uncorrelated replies")]
    BatchLengthMismatch { expected: usize, actual: usize },
}

/// A reply that does not conform to JSON-RPC 2.0.
///
/// Carries the offending value so misbehaving servers can be diagnosed from
/// the error message alone.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid JSON-RPC 2.0 reply: {reason}; got: {}", render(.payload))]
pub struct InvalidReplyError {
    pub reason: InvalidReplyReason,
    pub payload: Value,
}

impl InvalidReplyError {
    pub fn new(reason: InvalidReplyReason, payload: Value) -> Self {
        Self { reason, payload }
    }
}

fn render(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// The outcome member of a validated reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    Result(Value),
    Error(JsonRpcErrorObject),
}

/// A reply that passed structural validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReply {
    /// `None` when the server replied with `"id": null`
    pub id: Option<RequestId>,
    pub payload: ReplyPayload,
}

impl ValidatedReply {
    pub fn is_error(&self) -> bool {
        matches!(self.payload, ReplyPayload::Error(_))
    }
}

/// Reply validator
pub struct ReplyValidator;

impl ReplyValidator {
    /// Validate a single (non-batch) reply
    pub fn assert_single(raw: &Value) -> Result<ValidatedReply, InvalidReplyError> {
        check_single(raw).map_err(|reason| InvalidReplyError::new(reason, raw.clone()))
    }

    /// Validate a batch reply, element by element
    pub fn assert_batch(raw: &Value) -> Result<Vec<ValidatedReply>, InvalidReplyError> {
        let Value::Array(elements) = raw else {
            return Err(InvalidReplyError::new(
                InvalidReplyReason::NotAnArray,
                raw.clone(),
            ));
        };

        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                check_single(element).map_err(|reason| {
                    InvalidReplyError::new(
                        InvalidReplyReason::BatchElement {
                            index,
                            reason: Box::new(reason),
                        },
                        element.clone(),
                    )
                })
            })
            .collect()
    }
}

fn check_single(raw: &Value) -> Result<ValidatedReply, InvalidReplyReason> {
    let Value::Object(reply) = raw else {
        return Err(InvalidReplyReason::NotAnObject);
    };

    match reply.get("jsonrpc") {
        None => return Err(InvalidReplyReason::MissingVersion),
        Some(Value::String(v)) if v == crate::JSONRPC_VERSION => {}
        Some(other) => return Err(InvalidReplyReason::UnsupportedVersion(other.to_string())),
    }

    let raw_id = reply.get("id").ok_or(InvalidReplyReason::MissingId)?;
    let id = RequestId::from_value(raw_id)
        .map_err(|_| InvalidReplyReason::InvalidId(raw_id.to_string()))?;

    let result = reply.get("result");
    let error = reply.get("error");

    if let (Some(result), Some(error)) = (result, error)
        && is_truthy(result)
        && is_truthy(error)
    {
        return Err(InvalidReplyReason::ResultAndError);
    }

    if let Some(error) = error {
        let error = parse_error_member(error)?;
        return Ok(ValidatedReply {
            id,
            payload: ReplyPayload::Error(error),
        });
    }

    match result {
        Some(result) => Ok(ValidatedReply {
            id,
            payload: ReplyPayload::Result(result.clone()),
        }),
        None => Err(InvalidReplyReason::MissingOutcome),
    }
}

fn parse_error_member(error: &Value) -> Result<JsonRpcErrorObject, InvalidReplyReason> {
    let Value::Object(fields) = error else {
        return Err(InvalidReplyReason::ErrorNotObject);
    };

    if !has_keys(fields, &["code", "message"]) {
        return Err(InvalidReplyReason::MalformedError(render(error)));
    }

    serde_json::from_value(error.clone())
        .map_err(|e| InvalidReplyReason::MalformedError(format!("{}: {}", e, render(error))))
}

fn has_keys(fields: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().all(|key| fields.contains_key(*key))
}

/// JavaScript-style truthiness; servers commonly send `"error": null` or
/// `"result": 0` alongside the real member.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn reason(raw: Value) -> InvalidReplyReason {
        ReplyValidator::assert_single(&raw).unwrap_err().reason
    }

    #[test]
    fn test_success_reply() {
        let reply =
            ReplyValidator::assert_single(&json!({"jsonrpc": "2.0", "id": "a", "result": {"x": 1}}))
                .unwrap();

        assert_eq!(reply.id, Some(RequestId::from("a")));
        assert_eq!(reply.payload, ReplyPayload::Result(json!({"x": 1})));
    }

    #[test]
    fn test_error_reply_with_data() {
        let reply = ReplyValidator::assert_single(&json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {"code": -32601, "message": "Method not found", "data": {"required": ["x"]}}
        }))
        .unwrap();

        assert_eq!(reply.id, None);
        assert!(reply.is_error());
        assert_eq!(
            reply.payload,
            ReplyPayload::Error(JsonRpcErrorObject::new(
                -32601,
                "Method not found",
                Some(json!({"required": ["x"]}))
            ))
        );
    }

    #[test]
    fn test_null_result_is_a_success() {
        let reply =
            ReplyValidator::assert_single(&json!({"jsonrpc": "2.0", "id": 1, "result": null}))
                .unwrap();
        assert_eq!(reply.payload, ReplyPayload::Result(Value::Null));
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(reason(json!([])), InvalidReplyReason::NotAnObject);
        assert_eq!(reason(json!(null)), InvalidReplyReason::NotAnObject);
        assert_eq!(reason(json!("oops")), InvalidReplyReason::NotAnObject);
    }

    #[test]
    fn test_rejects_missing_or_wrong_version() {
        assert_eq!(
            reason(json!({"id": 1, "result": 1})),
            InvalidReplyReason::MissingVersion
        );
        assert_eq!(
            reason(json!({"jsonrpc": "1.0", "id": 1, "result": 1})),
            InvalidReplyReason::UnsupportedVersion("\"1.0\"".to_string())
        );
    }

    #[test]
    fn test_rejects_missing_id() {
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "result": 1})),
            InvalidReplyReason::MissingId
        );
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "id": true, "result": 1})),
            InvalidReplyReason::InvalidId("true".to_string())
        );
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "id": 1.5, "result": 1})),
            InvalidReplyReason::InvalidId("1.5".to_string())
        );
    }

    #[test]
    fn test_accepts_unsigned_64_bit_id() {
        let reply =
            ReplyValidator::assert_single(&json!({"jsonrpc": "2.0", "id": u64::MAX, "result": 1}))
                .unwrap();

        assert_eq!(
            reply.id.map(|id| id.correlation_key()),
            Some(u64::MAX.to_string())
        );
    }

    #[test]
    fn test_rejects_result_and_error_together() {
        assert_eq!(
            reason(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"ok": true},
                "error": {"code": 1, "message": "bad"}
            })),
            InvalidReplyReason::ResultAndError
        );
    }

    #[test]
    fn test_falsy_result_next_to_error_is_tolerated() {
        let reply = ReplyValidator::assert_single(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": null,
            "error": {"code": 1, "message": "bad"}
        }))
        .unwrap();
        assert!(reply.is_error());
    }

    #[test]
    fn test_rejects_malformed_error_member() {
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "id": 1, "error": "boom"})),
            InvalidReplyReason::ErrorNotObject
        );
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "id": 1, "error": null})),
            InvalidReplyReason::ErrorNotObject
        );
        assert!(matches!(
            reason(json!({"jsonrpc": "2.0", "id": 1, "error": {"message": "no code"}})),
            InvalidReplyReason::MalformedError(_)
        ));
        assert!(matches!(
            reason(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": 1}})),
            InvalidReplyReason::MalformedError(_)
        ));
        assert!(matches!(
            reason(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": "x", "message": "m"}})),
            InvalidReplyReason::MalformedError(_)
        ));
    }

    #[test]
    fn test_rejects_reply_without_outcome() {
        assert_eq!(
            reason(json!({"jsonrpc": "2.0", "id": 1})),
            InvalidReplyReason::MissingOutcome
        );
    }

    #[test]
    fn test_first_failing_check_wins() {
        // Missing version is reported before the missing id and the double outcome
        assert_eq!(
            reason(json!({"result": 1, "error": {"code": 1, "message": "m"}})),
            InvalidReplyReason::MissingVersion
        );
    }

    #[test]
    fn test_error_message_includes_payload() {
        let err = ReplyValidator::assert_single(&json!({"jsonrpc": "2.0", "result": 1})).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("must have an id"));
        assert!(message.contains("\"result\": 1"));
    }

    #[test]
    fn test_batch_requires_array() {
        let err = ReplyValidator::assert_batch(&json!({"jsonrpc": "2.0", "id": 1, "result": 1}))
            .unwrap_err();
        assert_eq!(err.reason, InvalidReplyReason::NotAnArray);
    }

    #[test]
    fn test_batch_reports_failing_element() {
        let err = ReplyValidator::assert_batch(&json!([
            {"jsonrpc": "2.0", "id": 1, "result": 1},
            {"jsonrpc": "2.0", "result": 2}
        ]))
        .unwrap_err();

        assert_eq!(
            err.reason,
            InvalidReplyReason::BatchElement {
                index: 1,
                reason: Box::new(InvalidReplyReason::MissingId)
            }
        );
        assert_eq!(err.payload, json!({"jsonrpc": "2.0", "result": 2}));
    }

    #[test]
    fn test_batch_success() {
        let replies = ReplyValidator::assert_batch(&json!([
            {"jsonrpc": "2.0", "id": 1, "result": {"name": "john"}},
            {"jsonrpc": "2.0", "id": 2, "error": {"code": -32000, "message": "down"}}
        ]))
        .unwrap();

        assert_eq!(replies.len(), 2);
        assert!(!replies[0].is_error());
        assert!(replies[1].is_error());
    }
}
