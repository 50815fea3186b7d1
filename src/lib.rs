//! Execute Packer
//!
//! Folds many independent API calls into one server-side `execute` script and
//! routes each call's slice of the aggregate result back to its callback.
//!
//! - **Accumulation**: [`Batch`] collects pending calls under identifiers `r0`, `r1`, ...
//! - **Code generation**: [`render`] turns a batch into script source
//! - **Dispatch**: [`dispatch`] executes the script through an [`Executor`]
//! - **Correlation**: [`correlate`] resolves every call exactly once
//!
//! [`Packer`] and [`SharedPacker`] wrap the pipeline behind enqueue/flush.
//!
//! ```ignore
//! use execute_packer::{Packer, PackerConfig, Params};
//!
//! let mut packer = Packer::from_config(PackerConfig::from_env());
//! let (_, me) = packer.enqueue_deferred("users.get", Params::new());
//! let (_, wall) = packer.enqueue_deferred("wall.get", Params::new().with("count", 1));
//! packer.flush();
//!
//! let me = me.wait().expect("flushed")?;
//! ```

pub mod batch;
pub mod code;
pub mod config;
pub mod correlate;
pub mod error;
pub mod packer;

pub use batch::{Batch, CallResult, Callback, Deferred, PendingCall};
pub use code::render;
pub use config::PackerConfig;
pub use correlate::{correlate, resolve_all, FlushReport};
pub use error::{
    map_execute_failure, MethodError, MethodResponse, PackerError, RequestParam,
    UNKNOWN_ERROR_CODE,
};
pub use packer::{dispatch, Packer, SharedPacker};

pub use packer_transport::{
    ApiError, ExecuteFailure, ExecuteResponse, Executor, FnExecutor, HttpExecutor, TransportConfig,
};
pub use packer_types::{Params, Value};
