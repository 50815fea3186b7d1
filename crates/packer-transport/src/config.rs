//! Transport configuration.
//!
//! Configuration via environment variables:
//!
//! - `PACKER_API_ENDPOINT` - method endpoint (default: `https://api.vk.com/method`)
//! - `PACKER_ACCESS_TOKEN` - access token sent with every script (default: empty)
//! - `PACKER_API_VERSION` - protocol version (default: `5.199`)
//! - `PACKER_TIMEOUT_SECS` - request timeout (default: 30)
//! - `PACKER_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)

use packer_types::env_utils::{env_string_or, env_var_or};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.vk.com/method";
pub const DEFAULT_API_VERSION: &str = "5.199";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings for [`HttpExecutor`](crate::HttpExecutor).
#[derive(Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub endpoint: String,
    pub access_token: String,
    pub version: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl TransportConfig {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            endpoint: env_string_or("PACKER_API_ENDPOINT", DEFAULT_ENDPOINT),
            access_token: env_string_or("PACKER_ACCESS_TOKEN", ""),
            version: env_string_or("PACKER_API_VERSION", DEFAULT_API_VERSION),
            timeout: Duration::from_secs(env_var_or(
                "PACKER_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_var_or(
                "PACKER_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// URL of the `execute` method.
    pub fn execute_url(&self) -> String {
        format!("{}/execute", self.endpoint.trim_end_matches('/'))
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: String::new(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "access_token",
                &if self.access_token.is_empty() { "" } else { "<redacted>" },
            )
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
