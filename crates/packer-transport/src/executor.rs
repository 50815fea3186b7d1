//! The remote script execution capability.

use crate::response::ExecuteResponse;
use anyhow::Result;
use std::sync::Arc;

/// Runs script source on the server and returns the aggregate result.
///
/// An `Err` means the script as a whole produced no usable output (network
/// failure, HTTP error, rejected request). Per-call failures inside a script
/// that did run are reported through [`ExecuteResponse::failures`] instead.
pub trait Executor: Send + Sync {
    fn execute(&self, code: &str) -> Result<ExecuteResponse>;
}

/// Adapts a closure into an [`Executor`].
///
/// ```
/// use packer_transport::{Executor, ExecuteResponse, FnExecutor};
///
/// let executor = FnExecutor(|_code: &str| ExecuteResponse::from_json(r#"{"response":{}}"#));
/// assert!(executor.execute("return {};").unwrap().responses.is_empty());
/// ```
pub struct FnExecutor<F>(pub F);

impl<F> Executor for FnExecutor<F>
where
    F: Fn(&str) -> Result<ExecuteResponse> + Send + Sync,
{
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        (self.0)(code)
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        (**self).execute(code)
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        (**self).execute(code)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        (**self).execute(code)
    }
}
