//! Matching batch replies back to the requests that produced them.
//!
//! JSON-RPC 2.0 servers may answer a batch in any order, so replies are
//! matched by id. Requests that cannot be keyed (no id, or an id shared with
//! another request in the same batch) take the leftover replies in order;
//! a batch without any ids therefore degrades to positional mapping.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::reply::{InvalidReplyError, InvalidReplyReason, ValidatedReply};

/// Reorder `replies` to line up with `request_ids`.
///
/// `raw` is the batch body the replies came from and is only used for
/// diagnostics. Every request receives exactly one reply; a keyed request
/// with no matching reply is treated as a lost response.
pub fn correlate(
    request_ids: &[Option<String>],
    replies: Vec<ValidatedReply>,
    raw: &Value,
) -> Result<Vec<ValidatedReply>, InvalidReplyError> {
    let fail = |reason| InvalidReplyError::new(reason, raw.clone());

    let keyed = unique_keys(request_ids);

    let mut by_key: HashMap<String, ValidatedReply> = HashMap::new();
    let mut leftover = Vec::new();
    for reply in replies {
        match reply.id.as_ref().map(|id| id.correlation_key()) {
            Some(key) if keyed.contains(key.as_str()) => {
                if by_key.contains_key(&key) {
                    return Err(fail(InvalidReplyReason::DuplicateReplyId(key)));
                }
                by_key.insert(key, reply);
            }
            _ => leftover.push(reply),
        }
    }

    let unkeyed = request_ids
        .iter()
        .filter(|id| !is_keyed(id, &keyed))
        .count();
    if unkeyed != leftover.len() {
        // A keyed request without its reply explains the gap better than a count
        if let Some(missing) = request_ids
            .iter()
            .flatten()
            .find(|id| keyed.contains(id.as_str()) && !by_key.contains_key(id.as_str()))
        {
            return Err(fail(InvalidReplyReason::MissingReply(missing.clone())));
        }
        return Err(fail(InvalidReplyReason::BatchLengthMismatch {
            expected: unkeyed,
            actual: leftover.len(),
        }));
    }

    let mut leftover = leftover.into_iter();
    request_ids
        .iter()
        .map(|id| match id {
            Some(key) if keyed.contains(key.as_str()) => by_key
                .remove(key)
                .ok_or_else(|| fail(InvalidReplyReason::MissingReply(key.clone()))),
            _ => leftover.next().ok_or_else(|| {
                fail(InvalidReplyReason::BatchLengthMismatch {
                    expected: unkeyed,
                    actual: 0,
                })
            }),
        })
        .collect()
}

/// Ids that appear exactly once in the batch
fn unique_keys(request_ids: &[Option<String>]) -> HashSet<&str> {
    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    for id in request_ids.iter().flatten() {
        if !seen.insert(id.as_str()) {
            duplicated.insert(id.as_str());
        }
    }
    seen.retain(|id| !duplicated.contains(id));
    seen
}

fn is_keyed(id: &Option<String>, keyed: &HashSet<&str>) -> bool {
    id.as_deref().is_some_and(|id| keyed.contains(id))
}
