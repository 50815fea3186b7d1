//! Decoding of `execute` responses.
//!
//! A successful body looks like:
//!
//! ```json
//! {
//!   "response": {"r0": [{"id": 1}], "r1": false},
//!   "execute_errors": [{"method": "wall.get", "error_code": 15, "error_msg": "Access denied"}]
//! }
//! ```
//!
//! `execute_errors` is not keyed: its n-th entry belongs to the n-th `false`
//! value in `response`, counted in the order the server wrote them. The
//! `response` object is therefore decoded into a `Vec` in document order and
//! never through a hashed map.

use anyhow::{anyhow, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Payload the server uses to mark a call inside the script as failed.
pub const FALSE_SENTINEL: &str = "false";

/// One failed call inside an executed script, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteFailure {
    /// Method the server attributes the failure to, when it says so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(rename = "error_code")]
    pub code: i64,
    #[serde(rename = "error_msg", default)]
    pub message: String,
}

/// The whole script was rejected (bad token, malformed code, flood control).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Aggregate result of one executed script.
#[derive(Debug, Default)]
pub struct ExecuteResponse {
    /// `(identifier, raw payload)` pairs in server emission order.
    pub responses: Vec<(String, Box<RawValue>)>,
    /// Failure descriptors in server emission order.
    pub failures: Vec<ExecuteFailure>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<Box<RawValue>>,
    #[serde(default)]
    execute_errors: Vec<ExecuteFailure>,
    #[serde(default)]
    error: Option<ExecuteFailure>,
}

impl ExecuteResponse {
    /// Decode an HTTP response body.
    ///
    /// A top-level `error` object is returned as an [`ApiError`]. A `response`
    /// that is missing, `null` or not an object yields no entries.
    pub fn from_json(body: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse execute response: {}", e))?;

        if let Some(err) = envelope.error {
            return Err(ApiError {
                code: err.code,
                message: err.message,
            }
            .into());
        }

        let responses = match envelope.response {
            Some(raw) if raw.get().trim_start().starts_with('{') => {
                serde_json::from_str::<OrderedResponses>(raw.get())
                    .map_err(|e| anyhow!("Failed to parse execute response object: {}", e))?
                    .0
            }
            _ => Vec::new(),
        };

        Ok(Self {
            responses,
            failures: envelope.execute_errors,
        })
    }

    /// Number of `false` payloads, i.e. failure descriptors the server owes us.
    pub fn failed_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|(_, payload)| is_false_sentinel(payload))
            .count()
    }
}

/// Whether `payload` is the server's "this call failed" marker.
pub fn is_false_sentinel(payload: &RawValue) -> bool {
    payload.get().trim() == FALSE_SENTINEL
}

struct OrderedResponses(Vec<(String, Box<RawValue>)>);

impl<'de> Deserialize<'de> for OrderedResponses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedResponsesVisitor)
    }
}

struct OrderedResponsesVisitor;

impl<'de> Visitor<'de> for OrderedResponsesVisitor {
    type Value = OrderedResponses;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of identifier to result")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((id, payload)) = map.next_entry::<String, Box<RawValue>>()? {
            entries.push((id, payload));
        }
        Ok(OrderedResponses(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_document_order() {
        let body = r#"{"response":{"r9":1,"r2":false,"r10":{"a":1},"r0":false},
            "execute_errors":[{"method":"a.b","error_code":5,"error_msg":"first"},
                              {"method":"c.d","error_code":7,"error_msg":"second"}]}"#;
        let resp = ExecuteResponse::from_json(body).unwrap();

        let ids: Vec<_> = resp.responses.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["r9", "r2", "r10", "r0"]);
        assert_eq!(resp.responses[2].1.get(), r#"{"a":1}"#);
        assert_eq!(resp.failed_count(), 2);
        assert_eq!(resp.failures[0].code, 5);
        assert_eq!(resp.failures[1].method.as_deref(), Some("c.d"));
    }

    #[test]
    fn test_decode_top_level_error() {
        let body = r#"{"error":{"error_code":5,"error_msg":"User authorization failed"}}"#;
        let err = ExecuteResponse::from_json(body).unwrap_err();
        let api = err.downcast_ref::<ApiError>().expect("api error");
        assert_eq!(api.code, 5);
        assert_eq!(api.message, "User authorization failed");
    }

    #[test]
    fn test_decode_non_object_response() {
        for body in [
            r#"{"response":null}"#,
            r#"{"response":[1,2]}"#,
            r#"{"response":false}"#,
            r#"{}"#,
        ] {
            let resp = ExecuteResponse::from_json(body).unwrap();
            assert!(resp.responses.is_empty(), "body: {body}");
            assert!(resp.failures.is_empty());
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ExecuteResponse::from_json("<html>").is_err());
    }

    #[test]
    fn test_false_sentinel() {
        let f = RawValue::from_string("false".to_string()).unwrap();
        let zero = RawValue::from_string("0".to_string()).unwrap();
        let s = RawValue::from_string("\"false\"".to_string()).unwrap();
        assert!(is_false_sentinel(&f));
        assert!(!is_false_sentinel(&zero));
        assert!(!is_false_sentinel(&s));
    }
}
