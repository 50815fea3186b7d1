//! Remote script execution transport.
//!
//! The batching layer talks to the server through one capability: submit a
//! script, get back the per-call results plus the ordered list of failures.
//!
//! - [`Executor`]: the capability as a trait, so tests and alternative
//!   transports can stand in for the network
//! - [`HttpExecutor`]: `ureq`-based implementation against the `execute` method
//! - [`ExecuteResponse`]: decoded aggregate result, kept in server emission order
//! - [`TransportConfig`]: endpoint, credentials and timeouts, from env or code
//!
//! # Example
//!
//! ```ignore
//! use packer_transport::{Executor, HttpExecutor, TransportConfig};
//!
//! let executor = HttpExecutor::new(TransportConfig::from_env());
//! let response = executor.execute(r#"return {"r0":API.users.get({})};"#)?;
//! for (id, payload) in &response.responses {
//!     println!("{id}: {}", payload.get());
//! }
//! ```

pub mod config;
pub mod executor;
pub mod http;
pub mod response;

pub use config::TransportConfig;
pub use executor::{Executor, FnExecutor};
pub use http::HttpExecutor;
pub use response::{is_false_sentinel, ApiError, ExecuteFailure, ExecuteResponse, FALSE_SENTINEL};
