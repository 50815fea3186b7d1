//! Dispatch of batches and the accumulating front-ends.
//!
//! [`dispatch`] is the whole pipeline for one batch: render, execute,
//! correlate. [`Packer`] and [`SharedPacker`] keep a current batch, accept
//! calls into it and swap in a fresh batch on every flush.

use crate::batch::{Batch, Deferred};
use crate::code::render;
use crate::config::PackerConfig;
use crate::correlate::{correlate, resolve_all, FlushReport};
use crate::error::{MethodResponse, PackerError};
use packer_transport::{Executor, HttpExecutor};
use packer_types::Params;
use parking_lot::Mutex;
use tracing::debug;

/// Send `batch` through `executor` and resolve every call in it.
///
/// If execution fails, each call receives the same
/// [`PackerError::Transport`] and an empty response. An empty batch is not
/// sent at all.
pub fn dispatch<E: Executor + ?Sized>(executor: &E, batch: Batch, debug: bool) -> FlushReport {
    if batch.is_empty() {
        return FlushReport::default();
    }

    let code = render(&batch);
    if debug {
        debug!(calls = batch.len(), "packer: batch: code:\n{}", code);
    }

    match executor.execute(&code) {
        Ok(response) => correlate(batch, response, debug),
        Err(err) => {
            debug!(calls = batch.len(), error = %err, "packer: batch: execute failed");
            resolve_all(batch, err)
        }
    }
}

/// Single-owner accumulator bound to an executor.
///
/// # Example
///
/// ```ignore
/// let mut packer = Packer::from_config(PackerConfig::from_env());
/// packer.enqueue("users.get", Params::new().with("user_ids", 1), |resp, err| {
///     println!("{:?} {:?}", resp.raw(), err);
/// });
/// let report = packer.flush();
/// ```
pub struct Packer<E> {
    executor: E,
    batch: Batch,
    debug: bool,
}

impl<E: Executor> Packer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            batch: Batch::new(),
            debug: false,
        }
    }

    /// Log generated code and per-call results at `debug` level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn enqueue<F>(&mut self, method: impl Into<String>, params: Params, callback: F) -> String
    where
        F: FnOnce(MethodResponse, Option<PackerError>) + Send + 'static,
    {
        self.batch.enqueue(method, params, callback)
    }

    pub fn enqueue_deferred(&mut self, method: impl Into<String>, params: Params) -> (String, Deferred) {
        self.batch.enqueue_deferred(method, params)
    }

    /// Number of calls waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Dispatch the current batch and start a new one.
    pub fn flush(&mut self) -> FlushReport {
        let batch = std::mem::take(&mut self.batch);
        dispatch(&self.executor, batch, self.debug)
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl Packer<HttpExecutor> {
    pub fn from_config(config: PackerConfig) -> Self {
        Packer::new(HttpExecutor::new(config.transport)).with_debug(config.debug)
    }
}

/// Accumulator usable from several threads.
///
/// Enqueues are serialized by a lock. [`SharedPacker::flush`] only holds the
/// lock long enough to swap the batch out, so new calls accumulate into the
/// next batch while the previous one is being executed.
pub struct SharedPacker<E> {
    executor: E,
    batch: Mutex<Batch>,
    debug: bool,
}

impl<E: Executor> SharedPacker<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            batch: Mutex::new(Batch::new()),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn enqueue<F>(&self, method: impl Into<String>, params: Params, callback: F) -> String
    where
        F: FnOnce(MethodResponse, Option<PackerError>) + Send + 'static,
    {
        self.batch.lock().enqueue(method, params, callback)
    }

    pub fn enqueue_deferred(&self, method: impl Into<String>, params: Params) -> (String, Deferred) {
        self.batch.lock().enqueue_deferred(method, params)
    }

    pub fn pending(&self) -> usize {
        self.batch.lock().len()
    }

    pub fn flush(&self) -> FlushReport {
        let batch = std::mem::take(&mut *self.batch.lock());
        dispatch(&self.executor, batch, self.debug)
    }
}

impl SharedPacker<HttpExecutor> {
    pub fn from_config(config: PackerConfig) -> Self {
        SharedPacker::new(HttpExecutor::new(config.transport)).with_debug(config.debug)
    }
}
