//! Demultiplexing of an aggregate result back to the pending calls.
//!
//! Every call of a batch is resolved exactly once, with one of four outcomes:
//! success, mapped failure, no response, or transport failure. The batch is
//! consumed, so nothing can be resolved twice across flushes either.
//!
//! Failed calls come back as a bare `false` payload. Their details live in
//! [`ExecuteResponse::failures`], which is ordered but not keyed: the n-th
//! `false` payload, in the order the server emitted it, owns the n-th
//! descriptor.

use crate::batch::Batch;
use crate::error::{map_execute_failure, MethodError, MethodResponse, PackerError, UNKNOWN_ERROR_CODE};
use packer_transport::{is_false_sentinel, ExecuteResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// Tally of how a flushed batch was resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub succeeded: usize,
    pub failed: usize,
    pub no_response: usize,
    pub transport_failed: usize,
    /// Result entries that matched no pending call.
    pub unregistered: usize,
}

impl FlushReport {
    /// Number of callbacks invoked.
    pub fn resolved(&self) -> usize {
        self.succeeded + self.failed + self.no_response + self.transport_failed
    }
}

/// Resolve every call in `batch` from `response`.
///
/// With `debug` set, each delivered payload is logged at `debug` level.
pub fn correlate(mut batch: Batch, response: ExecuteResponse, debug: bool) -> FlushReport {
    let mut report = FlushReport::default();
    let mut failures = response.failures.into_iter();

    for (id, payload) in response.responses {
        let Some(call) = batch.take(&id) else {
            warn!(id = %id, "packer: result for unregistered call dropped");
            report.unregistered += 1;
            continue;
        };

        let failed = is_false_sentinel(&payload);
        let mut method_response = MethodResponse::new(payload);

        if failed {
            let error = match failures.next() {
                Some(failure) => map_execute_failure(&call.method, &call.params, &failure),
                None => missing_failure(&call.method),
            };
            method_response.error = Some(error);
        }

        if debug {
            debug!(
                id = %id,
                method = %call.method,
                response = method_response.raw().unwrap_or_default(),
                error = ?method_response.error,
                "packer: call handler"
            );
        }

        match method_response.error.clone() {
            Some(err) => {
                report.failed += 1;
                call.resolve(method_response, Some(PackerError::Method(err)));
            }
            None => {
                report.succeeded += 1;
                call.resolve(method_response, None);
            }
        }
    }

    if failures.len() > 0 {
        warn!(
            extra = failures.len(),
            "packer: execute errors left over after correlation"
        );
    }

    for (id, call) in batch.drain() {
        if debug {
            debug!(id = %id, method = %call.method, "packer: no response");
        }
        report.no_response += 1;
        call.resolve(MethodResponse::default(), Some(PackerError::NoResponse));
    }

    report
}

/// Resolve every call in `batch` with the same transport error.
pub fn resolve_all(batch: Batch, error: anyhow::Error) -> FlushReport {
    let shared = Arc::new(error);
    let mut report = FlushReport::default();

    for (_, call) in batch.drain() {
        report.transport_failed += 1;
        call.resolve(
            MethodResponse::default(),
            Some(PackerError::Transport(Arc::clone(&shared))),
        );
    }

    report
}

fn missing_failure(method: &str) -> MethodError {
    MethodError {
        method: method.to_string(),
        code: UNKNOWN_ERROR_CODE,
        message: "server reported a failure without an execute error".to_string(),
        request_params: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packer_types::Params;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<(String, MethodResponse, Option<PackerError>)>>>;

    fn recorder(log: &Log, name: &str) -> impl FnOnce(MethodResponse, Option<PackerError>) + Send + 'static {
        let log = Arc::clone(log);
        let name = name.to_string();
        move |resp, err| log.lock().push((name, resp, err))
    }

    fn outcome<'a>(log: &'a [(String, MethodResponse, Option<PackerError>)], name: &str) -> &'a (String, MethodResponse, Option<PackerError>) {
        log.iter().find(|(n, _, _)| n == name).expect("callback invoked")
    }

    #[test]
    fn test_success_failure_and_missing() {
        let log: Log = Arc::default();
        let mut batch = Batch::new();
        batch.enqueue("a.ok", Params::new(), recorder(&log, "r0"));
        batch.enqueue("a.fail", Params::new().with("x", 1), recorder(&log, "r1"));
        batch.enqueue("a.lost", Params::new(), recorder(&log, "r2"));

        let response = ExecuteResponse::from_json(
            r#"{"response":{"r0":1,"r1":false},
                "execute_errors":[{"method":"a.fail","error_code":5,"error_msg":"access denied"}]}"#,
        )
        .unwrap();

        let report = correlate(batch, response, true);
        assert_eq!(
            report,
            FlushReport {
                succeeded: 1,
                failed: 1,
                no_response: 1,
                ..Default::default()
            }
        );

        let log = log.lock();
        assert_eq!(log.len(), 3);

        let (_, resp, err) = outcome(&log, "r0");
        assert_eq!(resp.raw(), Some("1"));
        assert!(err.is_none());

        let (_, resp, err) = outcome(&log, "r1");
        let method_err = err.as_ref().and_then(PackerError::as_method_error).expect("mapped");
        assert_eq!(method_err.code, 5);
        assert_eq!(method_err.message, "access denied");
        assert_eq!(resp.error.as_ref(), Some(method_err));
        assert_eq!(resp.raw(), Some("false"));

        let (_, resp, err) = outcome(&log, "r2");
        assert!(resp.is_empty());
        assert!(err.as_ref().is_some_and(PackerError::is_no_response));
    }

    #[test]
    fn test_failures_follow_server_order() {
        let log: Log = Arc::default();
        let mut batch = Batch::new();
        batch.enqueue("first", Params::new(), recorder(&log, "r0"));
        batch.enqueue("second", Params::new(), recorder(&log, "r1"));

        // The server lists r1 before r0, so r1 owns the first descriptor.
        let response = ExecuteResponse::from_json(
            r#"{"response":{"r1":false,"r0":false},
                "execute_errors":[{"error_code":7,"error_msg":"for r1"},
                                  {"error_code":9,"error_msg":"for r0"}]}"#,
        )
        .unwrap();

        correlate(batch, response, false);

        let log = log.lock();
        let code = |name| {
            outcome(&log, name)
                .2
                .as_ref()
                .and_then(PackerError::as_method_error)
                .map(|e| e.code)
        };
        assert_eq!(code("r1"), Some(7));
        assert_eq!(code("r0"), Some(9));
    }

    #[test]
    fn test_unregistered_and_repeated_ids_are_dropped() {
        let log: Log = Arc::default();
        let mut batch = Batch::new();
        batch.enqueue("only", Params::new(), recorder(&log, "r0"));

        let response = ExecuteResponse::from_json(
            r#"{"response":{"r7":false,"r0":"ok","r0":"again"}}"#,
        )
        .unwrap();

        let report = correlate(batch, response, false);
        assert_eq!(report.unregistered, 2);
        assert_eq!(report.succeeded, 1);

        let log = log.lock();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.raw(), Some(r#""ok""#));
    }

    #[test]
    fn test_false_without_descriptor() {
        let log: Log = Arc::default();
        let mut batch = Batch::new();
        batch.enqueue("m", Params::new(), recorder(&log, "r0"));

        let response = ExecuteResponse::from_json(r#"{"response":{"r0":false}}"#).unwrap();
        let report = correlate(batch, response, false);
        assert_eq!(report.failed, 1);

        let log = log.lock();
        let err = log[0].2.as_ref().and_then(PackerError::as_method_error).expect("mapped");
        assert_eq!(err.code, UNKNOWN_ERROR_CODE);
    }

    #[test]
    fn test_resolve_all_shares_one_error() {
        let log: Log = Arc::default();
        let mut batch = Batch::new();
        for name in ["r0", "r1", "r2"] {
            batch.enqueue("m", Params::new(), recorder(&log, name));
        }

        let report = resolve_all(batch, anyhow::anyhow!("timed out"));
        assert_eq!(report.transport_failed, 3);
        assert_eq!(report.resolved(), 3);

        let log = log.lock();
        let errors: Vec<_> = log
            .iter()
            .map(|(_, resp, err)| {
                assert!(resp.is_empty());
                match err {
                    Some(PackerError::Transport(e)) => Arc::clone(e),
                    other => panic!("expected transport error, got {:?}", other),
                }
            })
            .collect();
        assert!(Arc::ptr_eq(&errors[0], &errors[1]));
        assert!(Arc::ptr_eq(&errors[1], &errors[2]));
        assert_eq!(errors[0].to_string(), "timed out");
    }
}
