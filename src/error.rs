//! Per-call outcomes and the error taxonomy.
//!
//! | Outcome | Delivered as |
//! |---------|--------------|
//! | call succeeded | `MethodResponse` with payload, no error |
//! | call failed inside the script | [`PackerError::Method`] carrying a [`MethodError`] |
//! | server never mentioned the call | [`PackerError::NoResponse`] |
//! | the script could not be executed | [`PackerError::Transport`], shared by every call of the batch |
//!
//! Results for identifiers the batch does not know are only logged.

use packer_transport::ExecuteFailure;
use packer_types::{format_value, Params};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use std::sync::Arc;

/// Code used when the server marked a call as failed but sent no descriptor for it.
pub const UNKNOWN_ERROR_CODE: i64 = 0;

/// A request parameter echoed back for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub key: String,
    pub value: String,
}

/// Structured failure of a single call inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodError {
    pub method: String,
    pub code: i64,
    pub message: String,
    /// The call's non-reserved parameters, rendered as sent.
    pub request_params: Vec<RequestParam>,
}

impl fmt::Display for MethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed with code {}: {}", self.method, self.code, self.message)
    }
}

impl std::error::Error for MethodError {}

/// Build the [`MethodError`] for a call the server reported as failed.
pub fn map_execute_failure(method: &str, params: &Params, failure: &ExecuteFailure) -> MethodError {
    let request_params = params
        .visible()
        .map(|(key, value)| RequestParam {
            key: key.to_string(),
            value: format_value(value, 0),
        })
        .collect();

    MethodError {
        method: method.to_string(),
        code: failure.code,
        message: failure.message.clone(),
        request_params,
    }
}

/// Terminal failure delivered to a call's callback.
#[derive(Debug, Clone)]
pub enum PackerError {
    Method(MethodError),
    NoResponse,
    /// The batch's dispatch failed; every call of the batch holds the same error.
    Transport(Arc<anyhow::Error>),
}

impl PackerError {
    pub fn as_method_error(&self) -> Option<&MethodError> {
        match self {
            PackerError::Method(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_no_response(&self) -> bool {
        matches!(self, PackerError::NoResponse)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, PackerError::Transport(_))
    }
}

impl fmt::Display for PackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackerError::Method(err) => write!(f, "packer: {}", err),
            PackerError::NoResponse => write!(f, "packer: no response"),
            PackerError::Transport(err) => write!(f, "packer: transport: {:#}", err),
        }
    }
}

impl std::error::Error for PackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackerError::Method(err) => Some(err),
            PackerError::NoResponse => None,
            PackerError::Transport(err) => {
                let inner: &anyhow::Error = err;
                Some(inner.as_ref())
            }
        }
    }
}

impl From<MethodError> for PackerError {
    fn from(err: MethodError) -> Self {
        PackerError::Method(err)
    }
}

/// What a call's callback receives alongside its optional error.
#[derive(Debug, Clone, Default)]
pub struct MethodResponse {
    /// Raw payload as the server sent it; `None` when the call got no result.
    pub payload: Option<Box<RawValue>>,
    pub error: Option<MethodError>,
}

impl MethodResponse {
    pub fn new(payload: Box<RawValue>) -> Self {
        Self {
            payload: Some(payload),
            error: None,
        }
    }

    /// Raw JSON text of the payload, if any.
    pub fn raw(&self) -> Option<&str> {
        self.payload.as_deref().map(RawValue::get)
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Deserialize the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        let raw = self
            .raw()
            .ok_or_else(|| anyhow::anyhow!("method response has no payload"))?;
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Failed to decode method response: {}", e))
    }
}
