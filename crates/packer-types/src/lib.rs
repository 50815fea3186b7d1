//! Shared types for the execute-packer workspace.
//!
//! This crate holds the pieces both the transport and the batching layer need:
//!
//! - [`Value`] - closed tagged variant for method parameter values
//! - [`format_value`] - canonical text form of a [`Value`] for embedding in script source
//! - [`Params`] - ordered, key-unique parameter set for one method call
//! - [`env_utils`] - typed environment variable helpers used by the config layers

pub mod env_utils;
pub mod params;
pub mod value;

pub use params::{is_reserved_key, Params, ACCESS_TOKEN_KEY, META_KEY_PREFIX, VERSION_KEY};
pub use value::{format_value, Value};
