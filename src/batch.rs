//! Accumulation of pending calls for one `execute` round trip.
//!
//! A [`Batch`] is an owned value: fill it with [`Batch::enqueue`], then hand
//! it over to [`dispatch`](crate::dispatch), which consumes it. Identifiers
//! (`r0`, `r1`, ...) are unique only within one batch.

use crate::error::{MethodResponse, PackerError};
use packer_types::Params;
use std::collections::HashMap;
use std::sync::mpsc;

/// Completion callback of a pending call. Invoked exactly once.
pub type Callback = Box<dyn FnOnce(MethodResponse, Option<PackerError>) + Send + 'static>;

/// Outcome delivered through a [`Deferred`].
pub type CallResult = Result<MethodResponse, PackerError>;

/// A call waiting for its batch to be flushed.
pub struct PendingCall {
    pub method: String,
    pub params: Params,
    callback: Callback,
}

impl PendingCall {
    /// Resolve the call. Consuming `self` makes a second resolution impossible.
    pub(crate) fn resolve(self, response: MethodResponse, error: Option<PackerError>) {
        (self.callback)(response, error);
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("method", &self.method)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Pending calls keyed by identifier, remembered in enqueue order.
#[derive(Debug, Default)]
pub struct Batch {
    order: Vec<String>,
    calls: HashMap<String, PendingCall>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a call and return its identifier.
    ///
    /// Parameters are not validated; reserved keys are allowed here and are
    /// dropped when the script is rendered.
    pub fn enqueue<F>(&mut self, method: impl Into<String>, params: Params, callback: F) -> String
    where
        F: FnOnce(MethodResponse, Option<PackerError>) + Send + 'static,
    {
        let id = format!("r{}", self.order.len());
        self.order.push(id.clone());
        self.calls.insert(
            id.clone(),
            PendingCall {
                method: method.into(),
                params,
                callback: Box::new(callback),
            },
        );
        id
    }

    /// Add a call whose outcome is read from the returned [`Deferred`].
    pub fn enqueue_deferred(&mut self, method: impl Into<String>, params: Params) -> (String, Deferred) {
        let (tx, rx) = mpsc::sync_channel(1);
        let id = self.enqueue(method, params, move |response, error| {
            let outcome = match error {
                Some(err) => Err(err),
                None => Ok(response),
            };
            // The receiver may have been dropped; the caller chose to ignore the outcome.
            let _ = tx.send(outcome);
        });
        (id, Deferred { rx })
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PendingCall> {
        self.calls.get(id)
    }

    /// Identifiers of calls still pending, in enqueue order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| self.calls.contains_key(*id))
    }

    /// Pending calls in enqueue order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PendingCall)> {
        self.order
            .iter()
            .filter_map(|id| self.calls.get(id).map(|call| (id.as_str(), call)))
    }

    pub(crate) fn take(&mut self, id: &str) -> Option<PendingCall> {
        self.calls.remove(id)
    }

    /// Remove every remaining call, in enqueue order.
    pub(crate) fn drain(mut self) -> Vec<(String, PendingCall)> {
        let mut remaining = Vec::with_capacity(self.calls.len());
        for id in std::mem::take(&mut self.order) {
            if let Some(call) = self.calls.remove(&id) {
                remaining.push((id, call));
            }
        }
        remaining
    }
}

/// Receiving end of [`Batch::enqueue_deferred`].
#[derive(Debug)]
pub struct Deferred {
    rx: mpsc::Receiver<CallResult>,
}

impl Deferred {
    /// Block until the call resolves.
    ///
    /// Returns `None` only if the batch was dropped without being flushed.
    pub fn wait(self) -> Option<CallResult> {
        self.rx.recv().ok()
    }

    /// The outcome if the call has already resolved.
    pub fn try_get(&self) -> Option<CallResult> {
        self.rx.try_recv().ok()
    }
}
