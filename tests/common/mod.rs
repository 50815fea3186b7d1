//! Shared helpers for execute-packer integration tests.

#![allow(dead_code)]

pub mod mocks;

use execute_packer::{MethodResponse, PackerError};
use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded callback invocation.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub name: String,
    pub response: MethodResponse,
    pub error: Option<PackerError>,
}

/// Collects callback invocations so tests can assert exactly-once delivery.
#[derive(Clone, Default)]
pub struct CallbackLog {
    inner: Arc<Mutex<Vec<Resolution>>>,
}

impl CallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that records under `name`.
    pub fn callback(
        &self,
        name: &str,
    ) -> impl FnOnce(MethodResponse, Option<PackerError>) + Send + 'static {
        let inner = Arc::clone(&self.inner);
        let name = name.to_string();
        move |response, error| {
            inner.lock().push(Resolution {
                name,
                response,
                error,
            })
        }
    }

    pub fn total(&self) -> usize {
        self.inner.lock().len()
    }

    /// Number of times `name` was resolved.
    pub fn count(&self, name: &str) -> usize {
        self.inner.lock().iter().filter(|r| r.name == name).count()
    }

    /// The single resolution recorded for `name`.
    pub fn get(&self, name: &str) -> Resolution {
        let log = self.inner.lock();
        let mut matches = log.iter().filter(|r| r.name == name);
        let first = matches
            .next()
            .unwrap_or_else(|| panic!("{name} was never resolved"))
            .clone();
        assert!(matches.next().is_none(), "{name} was resolved more than once");
        first
    }
}
